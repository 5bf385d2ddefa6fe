#![no_main]

use libfuzzer_sys::fuzz_target;
use y86_core::{load_image_str, Decoder, LoadOptions, Machine, Status};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a raw code image at address zero: stepping must
    // only ever surface status transitions, never a panic.
    let mut machine = Machine::default();
    for (offset, byte) in data.iter().enumerate().take(4096) {
        let _ = machine.mem.write1(offset as i64, *byte);
    }

    for _ in 0..64 {
        let _ = Decoder::fetch(&machine.mem, machine.pc);
        let snapshot = machine.step();
        assert!(Status::from_u8(snapshot.stat).is_some());
        if machine.status != Status::Aok {
            break;
        }
    }

    // The loader must ignore arbitrary text without panicking.
    let text = String::from_utf8_lossy(data);
    let loaded = load_image_str(&text, &LoadOptions::default());
    let _ = loaded.snapshot();
});
