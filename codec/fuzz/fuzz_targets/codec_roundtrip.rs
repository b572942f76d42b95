#![no_main]

use arbitrary::Arbitrary;
use bitweave_codec::{combinators, primitives, tagged_union, Codec};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

#[derive(Arbitrary, Debug, PartialEq)]
enum Record {
    Ping,
    Name(String),
    Sample {
        id: u32,
        value: Option<i64>,
        tags: Vec<String>,
    },
}

fn record_codec() -> &'static Codec<Record> {
    static CODEC: OnceLock<Codec<Record>> = OnceLock::new();
    CODEC.get_or_init(|| {
        tagged_union::<Record>()
            .variant0(0, || Record::Ping, |v| matches!(v, Record::Ping))
            .variant1(1, primitives::string(), Record::Name, |v| match v {
                Record::Name(name) => Some(name),
                _ => None,
            })
            .variant3(
                2,
                primitives::u32(),
                combinators::maybe(primitives::i64()),
                combinators::list(primitives::string()),
                |id, value, tags| Record::Sample { id, value, tags },
                |v| match v {
                    Record::Sample { id, value, tags } => Some((id, value, tags)),
                    _ => None,
                },
            )
            .build()
    })
}

#[derive(Arbitrary, Debug)]
struct Input {
    record: Record,
    raw: Vec<u8>,
}

fn roundtrip(record: &Record) {
    let codec = record_codec();
    let encoded = codec.encode(record);
    let decoded = codec
        .decode(&encoded)
        .expect("Failed to decode a successfully encoded input!");
    assert_eq!(&decoded, record);
}

fn decode_arbitrary(raw: &[u8]) {
    // Arbitrary bytes must either decode or fail with a typed error; any
    // panic or over-read is a bug.
    let codec = record_codec();
    if let Ok(decoded) = codec.decode(raw) {
        assert_eq!(codec.encode(&decoded).as_ref(), raw);
    }
}

fuzz_target!(|input: Input| {
    roundtrip(&input.record);
    decode_arbitrary(&input.raw);
});
