#![no_main]

use libfuzzer_sys::fuzz_target;
use farthest::bridge::protocol::parse_inbound;
use farthest::driver::DriverInput;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        if let Ok(message) = parse_inbound(line) {
            let reencoded = serde_json::to_string(&message).expect("parsed message re-encodes");
            assert!(parse_inbound(&reencoded).is_ok(), "re-encoded message parses");
            let _ = DriverInput::from(message);
        }
    }
});
