//! Captured sFlow v5 datagrams shared by the integration tests.

#![allow(dead_code)]

/// Two IPv4 flow samples from a switch, the second VLAN tagged.
pub const IPV4_SWITCHED: &str = concat!(
    "0000000500000001c0a80102000000100000f3d40bfa047f0000000200000001000000d00001210a000001fe00000400",
    "0484240000000000000001fe00000200000000020000000100000090000000010000010b0000000400000080000c2936",
    "d3d694c691aa97600800450000f9f19040004011b4f5c0a80913c0a8090a00a1ba0500e5641f3081da02010104066d6f",
    "746f6770a281cc02047b46462e0201000201003081bd3012060d2b06010201190501010281dc710201003013060d2b06",
    "010201190501010281e66802025acc3012060d2b0601020119050101000003e900000010000000090000000000000009",
    "0000000000000001000000d00000e3cc000002100000400048eb74000000000000000210000002000000000200000001",
    "0000009000000001000000970000000400000080000c2936d3d6fcecda44008f81000009080045000081186440003f11",
    "9098c0a80815c0a8090a9a690202006d23083c33303e4170722031312030393a33333a3031206b6e6f64653120736e6d",
    "70645b313039385d3a20436f6e6e656374696f6e2066726f6d205544503a205b3139322e3136382e392e31305d3a3439",
    "3233362d000003e90000001000000009000000000000000900000000",
);

/// Three expanded flow samples: two TCP, one ESP.
pub const EXPANDED_FLOW: &str = concat!(
    "00000005000000010a00015000000000000f58998ae119780000000300000003000000c4000b62a90000000000100c84",
    "0000040024fb7e1e0000000000000000001017840000000000100c8400000001000000010000009000000001000005bc",
    "0000000400000080001b17000130001201f58d44810023710800450205a6305440007e06ee92ac100016d94d52f50599",
    "7e701fa1e17aff62574a50100200355f000000ffff00000b004175746f72697a7a6174610400008040ffff0004000080",
    "40050031303030320500313030302004000000000868a200000000000000000860a200000000000000000003000000c4",
    "0003cecf000000000010170400004000a168ac1c00000000000000000010178400000000001017040000000100000001",
    "0000009000000001000005f200000004000000800024e8324338d4ae52aa0b54810020060800450005dc542040008006",
    "1397c0a8060cc0a806080050efcfbb25bad9a21c839a501000fff54000008a55f70975a0ff88b05735597ae274bd81fc",
    "ba17e6e9206b8ea0fb07d05fc27dad06cfe3fdba5d2fc4d057b0add711e596cbe5e9b4bbe8be59cd77537b7a89f7414a",
    "628b736d00000003000000c0000c547a0000000000100c04000004005bc3c3b500000000000000000010178400000000",
    "00100c0400000001000000010000008c000000010000007e000000040000007a001b17000130001201f58d4481002371",
    "08004500006824ea4000ff32c326d94d5105501018f02e88d003000001dd39b1d025d1c68689583b2ab21522d5b5a959",
    "642243804f6d51e63323091cc04544285433eb3f6b29e1046a6a2fa7806319d62041d8fa4bd25b7cd85b8db54202054a",
    "077ac11de84acbe37a550004",
);

/// Six flow samples from a router, each with extended switch and router records.
pub const IPV4_ROUTED: &str = concat!(
    "000000050000000189dd4f010000000000003d4f21151ad40000000600000001000000bc354b97090000020c000013b1",
    "75792bea000000000000028f0000020c0000000300000001000000640000000100000058000000040000005408b2587a",
    "57624c16fc0b61a5080045000046c3e440003a1118a0052aada7569e5ab367a6e35b0032d7bbf1f2fb2eb2490a97f87a",
    "bc31e135834be367000002590000ffffffffffffffff02add830d51e0aec14cf000003e9000000100000000000000000",
    "0000000000000000000003ea0000001000000001c342e32a000000160000000b00000001000000a88b8ffb57000002a2",
    "000013b12e344fd800000000000002a20000028f0000000300000001000000500000000100000042000000040000003e",
    "4c16fc0b6202c03e0fdecafe080045000030108000007d11fe45575185a718693996f0570e8c001c20614ad602003fd6",
    "d4afa6a6d18207324000271169b00000000003e90000001000000000000000000000000000000000000003ea00000010",
    "0000000189dd4f210000000f0000001800000001000000e8354b970a0000020c000013b175793f9b000000000000028f",
    "0000020c00000003000000010000009000000001000001a500000004000000800231466d0b2c4c16fc0b61a508004500",
    "0193198f40003a114b75052aae1f5f94c778678ef24d017f50ea7622287c30799e1f7d45932d01ca92c46d930000927c",
    "0000ffffffffffffffff02ad0eea6498953d1c7ebb6dbdf0525c80e1a9a62bacfea92f69b7336c2f2f60eba0593509e1",
    "4eef167eb37449f05ad70b8241c1a46d000003e90000001000000000000000000000000000000000000003ea00000010",
    "00000001c342e1fd000000160000001000000001000000e8354b970b0000020c000013b17579534c000000000000028f",
    "0000020c00000003000000010000009000000001000000b500000004000000800231466d0b2c4c16fc0b61a508004500",
    "00a327c240003606fd67b93c706a021ff365045fe8a0976d624df8207083501800edb31b0000485454502f312e312032",
    "3030204f4b0d0a5365727665723a2050726f746f636f6c20485454500d0a436f6e74656e742d4c656e6774683a203134",
    "30340d0a436f6e6e656374696f6e3a20000003e90000001000000000000000000000000000000000000003ea00000010",
    "00000001c342e1fd000000170000001000000001000000e8354b970c0000020c000013b1757966fd000000000000028f",
    "0000020c000000030000000100000090000000010000018e00000004000000800231466d0b2c4c16fc0b61a508004500",
    "017c7d2c40003a116963052abd8d021c940e67e7e0d501682342dbe7936bd47ef487dee5591ec1b24d83622e00007225",
    "0000ffffffffffffffff02ad0039d8ba86a90017071d76b177de4d8c4e23bcaaaf4d795f77b032f959e0fb70234d4c28",
    "922d4e08dd3330c66e34bff51cc8ade5000003e90000001000000000000000000000000000000000000003ea00000010",
    "00000001c342e1fd000000160000001000000001000000e80d6146ac000002a1000013b17880b49d00000000000002a1",
    "0000028f00000003000000010000009000000001000005ee00000004000000804c16fc0b6201d8b122766a2c08004500",
    "05dc04574000770623a11fcd80a218691d4cf2fe01bbd4f47482065fd63a5010fabd7987000052a20002c8c43ea91ca1",
    "eaa115663f5218a37fbb409dfbbedff54731ef41199b35535905ac2366a05a803146ced544abf45597f3714327d59f99",
    "e30c899c39fc5a4b67d12087bf8db2bc000003e90000001000000000000000000000000000000000000003ea00000010",
    "0000000189dd4f210000001000000018",
);

/// One IPv6 UDP flow sample.
pub const IPV6_SWITCHED: &str = concat!(
    "00000005000000010ae0648100000002000093d824ac82340000000100000001000000d000019f940000010100001000",
    "19f94000000000000000010100000000000000020000000100000090000000010000058c00000008000000800008e3ff",
    "fc10d4f4be04612486dd60000000054e113a2607f8b0400200140000000000000008262000edc000e804a25e30c581af",
    "36fa01bbfa6f054e249810b584bcbf12926c2e29a779c26c72db483e8191524fe2288bfdaceaf9d2e724d04305706efc",
    "fdef70db86873bbacf29698affe4e7d6faa21d302f9b4b023291a05a000003e900000010000000010000000000000001",
    "00000000",
);

/// Expanded counter samples followed by expanded flow samples.
pub const EXPANDED_FLOW_COUNTER: &str = concat!(
    "00000005000000010a00015000000000000f58898ae0fa380000000700000004000000ec00006ece0000000000101784",
    "000000030000000200000034000000000000000000000000000000000000000000000000000000000000000000000000",
    "000000000000000000000000000000000000000100000058001017840000000600000002540be4000000000100000003",
    "00007b8ebd37b97e61ff94860803e8e908ffb2b500000000000000000000000000018e7c31ee7ba4195f041874579ff0",
    "21ba936300000000000000000000000100000007000000380011223344550003f8b15645e7e7d6960000002fe2fc02fc",
    "01edbf580000000000000000000000000000000001dcb9cf000000000000000000000004000000ec00006ece00000000",
    "001001840000000300000002000000340000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000100000058001001840000000600000002540be40000000001",
    "0000000300000841131d1fd9f850bfb103617cb401e6598900000000000000000000000000000bec1902e5da9212e3e9",
    "6d7996e922513250000000000000000000000001000000070000003800112233445500005c260acbddb3000100000003",
    "e2fc02fc01ee414f0000000000000000000000000000000001dccdd30000000000000000000000030000008400004606",
    "000000000010030400004000ad9dc19b0000000000000000001017840000000000100304000000010000000100000050",
    "000000010000004400000004000000400012815116c4001517cf426d8100200608004500002895da40008006d74bc0a8",
    "060ac0a8064f04ef04aab1797122cf7eaf4f5010ffff7727000000000000000000000003000000b0001bd69800000000",
    "0010148400000400700b180f000000000000000000101504000000000010148400000001000000010000007c00000001",
    "0000006f000000040000006b001b17000131f0f755b9afc081000439080045000059045340005206920c1f0d4703d94d",
    "52e201bbf14977d1e9f15498af36801800417f1100000101080afdf3c70400e043871503010020ff268cfe2e2fd5fffe",
    "1d3d704a91d57b895f174c4b4428c66679d80a307294303f00000003000000c40003ceca000000000010170400004000",
    "a166aa7a000000000000000000101784000000000010170400000001000000010000009000000001000005f200000004",
    "000000800024e8369e2bd4ae52aa0b54810020060800450005dc4c71400080061b45c0a8060cc0a806090050f855692a",
    "7a94a1154ae1801001046b6a00000101080a6869a48d151016d046a84a7aa1c6743fa05179f7ecbd4e567150cb6f2077",
    "ff89480ae730637d26d2237c08548806f672c7476eb1b5a447b42cb9ce405994d152fa3e000000030000008c001bd699",
    "000000000010148400000400700b180f0000000000000000001015040000000000101484000000010000000100000058",
    "000000010000004a0000000400000046001b17000131f0f755b9afc0810004390800450000340ce040003a06bea5c1ce",
    "8793d94d528f00504c3b08b18f275b83d5df8010054586ad00000101050a5b83d5de5b83d5df11d800000003000000c4",
    "00004e07000000000010028400004000c7ec97f200000000000000000010078400000000001002840000000100000001",
    "0000009000000001000005f2000000040000008000005e0001ff005056800dd18100000a0800450005dc5a4240004006",
    "6ef70a000ac8c0a8967201bbe17c81597908caf8a05f5010010328610000f172263da0ba5d6223c079b8238bc841256b",
    "f17c4ffb08ad11c4fbff6f87ae1624a6b057b8baa9342114e5f5b46179083020cb560c4e9eadcec6dfd83e102ddbc270",
    "24803eb5",
);

/// Two expanded counter samples, no flows.
pub const FLOW_EXPANDED_COUNTER: &str = concat!(
    "00000005000000010a000150000000000006d14d8ae0fe200000000200000004000000ac00006d15000000004b00ca00",
    "000000020000000200000034000000000000000000000000000000000000000000000000000000000000000000000000",
    "0000000000000000000000000000000000000001000000584b00ca000000000100000000000000000000000100000001",
    "0000308ae33bb950eb92a8a3004d0bb406899571000000000000000000000000000012f7ed9c9db8c24ed90604eaf0bd",
    "04636edb00000000000000000000000100000004000000ac00006d15000000004b005400000000020000000200000034",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "0000000000000001000000584b00540000000001000000003b9aca000000000100000003000067ba8e64fd23fa65f26d",
    "0215ec4a0021086600000000000000000000000000002002c3b21045c2378ad3001fb2f3000618720000000000000000",
    "00000001",
);

/// Four counter samples with generic interface and ethernet records.
pub const COUNTER_GENERIC_ETHERNET: &str = concat!(
    "0000000500000001c0a80102000000100000f3e70bfb3f590000000400000002000000a800000005000001fc00000002",
    "0000000100000058000001fc00000006000000003b9aca000000000100000003000000035cfc18b203042a0800000012",
    "0000004900000000000000000000000000000000c818b33e018afb7d00176fa30021698f000000000000000000000000",
    "000000020000003400000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000002000000a800000005000001fa000000020000000100000058000001fa00000006",
    "000000003b9aca00000000010000000300000132e5eee21da6c2e42d000003fa00000015000000000000000000000000",
    "00000100abe764d694ed34b100176bca0021697f00000000000000000000000000000002000000340000000000000000",
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002",
    "000000a800000005000001f8000000020000000100000058000001f800000006000000003b9aca000000000100000003",
    "000001302c8b23eab41128d2000003e5000000120000000000000000000000000000019abd2b695de4797c3400176c3a",
    "002169910000000000000000000000000000000200000034000000000000000000000000000000000000000000000000",
    "0000000000000000000000000000000000000000000000000000000000000002000000a800000005000001f600000002",
    "0000000100000058000001f600000006000000003b9aca0000000001000000030000011dbd163e689cba2cc7000003e5",
    "000000520000000000000000000000000000010348cead1888a1e1ae00176c4f00216b89000000000000000000000000",
    "000000020000003400000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "000000000000000000000000",
);

pub fn datagram(fixture: &str) -> Vec<u8> {
    hex::decode(fixture).expect("fixture is valid hex")
}
