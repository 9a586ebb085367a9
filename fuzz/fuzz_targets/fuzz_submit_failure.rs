#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    // Arbitrary Horizon error bodies must classify without panicking.
    let _ = pocket_horizon::failure::from_response_body(body);
    let _ = pocket_horizon::failure::from_message(body);
});
