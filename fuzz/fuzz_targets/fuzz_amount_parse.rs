#![no_main]

use libfuzzer_sys::fuzz_target;
use pocket_types::Amount;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Every parsed amount must survive both renderings.
    if let Ok(amount) = s.parse::<Amount>() {
        assert_eq!(amount.to_fixed_string().parse::<Amount>(), Ok(amount));
        assert_eq!(amount.to_string().parse::<Amount>(), Ok(amount));
    }
});
