//! Microbenchmarks for the instruction loop and the scanline renderer, run over a small
//! synthetic ROM (a tight branch loop) rather than a real game dump, so the benchmark
//! suite carries no copyrighted ROM data.

use criterion::{criterion_group, criterion_main, Criterion};
use gb_core::emulator::Emulator;
use gb_core::EmulatorOptions;

/// `JP 0x0100`: an infinite loop at the post-boot entry point, 4 M-cycles per iteration.
fn synthetic_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x147] = 0x00; // ROM ONLY
    rom[0x148] = 0x00; // 32 KiB
    rom[0x149] = 0x00; // no RAM
    rom[0x100] = 0xC3;
    rom[0x101] = 0x00;
    rom[0x102] = 0x01;
    rom
}

fn cpu_loop_benchmark(c: &mut Criterion) {
    let mut emulator = Emulator::new(synthetic_rom(), EmulatorOptions::default()).unwrap();
    c.bench_function("step one instruction", |b| b.iter(|| emulator.step_cycle()));
}

fn frame_benchmark(c: &mut Criterion) {
    let mut emulator = Emulator::new(synthetic_rom(), EmulatorOptions::default()).unwrap();
    c.bench_function("step one frame", |b| b.iter(|| emulator.step_frame()));
}

criterion_group!(benches, cpu_loop_benchmark, frame_benchmark);
criterion_main!(benches);
