#![no_main]

use libfuzzer_sys::fuzz_target;
use farthest::config::ConfigLoader;
use farthest::config::loader::inline_source;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        // Only panics matter here.
        let _ = ConfigLoader::default().load_from_str(yaml_str, &inline_source());
    }
});
