//! Deterministic trace fingerprint over a reference program.
//!
//! Runs a small call/return image to completion and folds every snapshot
//! into an FNV-1a hash, so two hosts (or two builds) can compare a single
//! line of output instead of full traces.

use y86_core::{load_image_str, LoadOptions, Status};

const REFERENCE_IMAGE: &str = "\
0x0: 30 f4 00 01 00 00 00 00 00 00
0xa: 80 14 00 00 00 00 00 00 00
0x13: 00
0x14: 30 f0 2a 00 00 00 00 00 00 00
0x1e: a0 0f
0x20: b0 3f
0x22: 90
";

const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

struct Fingerprint(u64);

impl Fingerprint {
    const fn new() -> Self {
        Self(FNV_OFFSET)
    }

    fn fold_u64(&mut self, value: u64) {
        for byte in value.to_le_bytes() {
            self.0 = (self.0 ^ u64::from(byte)).wrapping_mul(FNV_PRIME);
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn fold_i64(&mut self, value: i64) {
        self.fold_u64(value as u64);
    }
}

fn main() {
    let mut machine = load_image_str(REFERENCE_IMAGE, &LoadOptions::default());
    let mut fingerprint = Fingerprint::new();
    let mut steps = 0_u32;

    while machine.status == Status::Aok && steps < 1_000 {
        let snapshot = machine.step();
        steps += 1;

        fingerprint.fold_u64(u64::from(snapshot.stat));
        fingerprint.fold_i64(snapshot.pc);
        fingerprint.fold_u64(u64::from(snapshot.cc.zf));
        fingerprint.fold_u64(u64::from(snapshot.cc.sf));
        fingerprint.fold_u64(u64::from(snapshot.cc.of));
        for (base, value) in &snapshot.mem {
            fingerprint.fold_u64(*base);
            fingerprint.fold_i64(*value);
        }
        fingerprint.fold_i64(snapshot.reg.rax);
        fingerprint.fold_i64(snapshot.reg.rsp);
    }

    println!("steps={steps} status={} fingerprint={:016x}", machine.status.as_u8(), fingerprint.0);
}
