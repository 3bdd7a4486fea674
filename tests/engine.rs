use chip8_vm::display::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_vm::state::{FONT_DATA, MAX_ROM_SIZE, MEM_SIZE, Register};
use chip8_vm::{Chip8, Error, Opcode};

fn engine_with(rom: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_seed(7);
    chip8.load_program(rom).unwrap();
    chip8
}

fn pixels(chip8: &Chip8) -> Vec<Vec<bool>> {
    chip8
        .framebuffer()
        .rows()
        .map(|row| row.collect())
        .collect()
}

#[test]
fn load_then_add() {
    let mut chip8 = engine_with(&[0x60, 0x0A, 0x70, 0x05]);
    chip8.tick().unwrap();
    chip8.tick().unwrap();

    assert_eq!(chip8.register(Register::V0), 15);
    assert_eq!(chip8.pc(), 0x204);
}

#[test]
fn draw_font_glyph_zero() {
    let mut rom = vec![0xA2, 0x10, 0xD0, 0x05];
    rom.resize(0x10, 0x00);
    rom.extend_from_slice(&FONT_DATA[..5]);
    let mut chip8 = engine_with(&rom);

    chip8.tick().unwrap();
    chip8.tick().unwrap();

    // V0 = V1 = 0, so the glyph sits at the origin.
    let expected = [
        [true, true, true, true, false, false, false],
        [true, false, false, true, false, false, false],
        [true, false, false, true, false, false, false],
        [true, false, false, true, false, false, false],
        [true, true, true, true, false, false, false],
    ];
    let fb = chip8.framebuffer();
    for (y, row) in expected.iter().enumerate() {
        for (x, &lit) in row.iter().enumerate() {
            assert_eq!(fb.pixel(x, y), lit, "pixel ({x}, {y})");
        }
        // Sprite column 7 comes from bit 0 and is never drawn.
        assert!(!fb.pixel(7, y));
    }
    assert_eq!(fb.lit_count(), 14);
    assert_eq!(chip8.register(Register::VF), 0);
}

#[test]
fn drawing_same_sprite_twice_restores_display() {
    // V0 = 12, V1 = 9, I = glyph "8", then the same DRW twice.
    let rom = [
        0x60, 0x0C, 0x61, 0x09, 0xA0, 0x28, 0xD0, 0x15, 0xD0, 0x15,
    ];
    let mut chip8 = engine_with(&rom);
    for _ in 0..3 {
        chip8.tick().unwrap();
    }
    let before = pixels(&chip8);

    chip8.tick().unwrap();
    assert_ne!(pixels(&chip8), before);
    chip8.tick().unwrap();
    assert_eq!(pixels(&chip8), before);
}

#[test]
fn jump_then_skip_loop() {
    // 0x200: LD V2, 01
    // 0x202: SE V2, 01   -> skips 0x204
    // 0x204: JP 200
    // 0x206: JP 20A
    // 0x208: (unused)
    // 0x20A: ADD V2, 01
    let rom = [
        0x62, 0x01, 0x32, 0x01, 0x12, 0x00, 0x12, 0x0A, 0x00, 0x00, 0x72, 0x01,
    ];
    let mut chip8 = engine_with(&rom);

    chip8.tick().unwrap();
    chip8.tick().unwrap();
    assert_eq!(chip8.pc(), 0x206);
    chip8.tick().unwrap();
    assert_eq!(chip8.pc(), 0x20A);
    chip8.tick().unwrap();
    assert_eq!(chip8.register(Register::V2), 2);
    assert_eq!(chip8.pc(), 0x20C);
}

#[test]
fn unknown_instructions_do_not_halt() {
    let mut chip8 = engine_with(&[0x00, 0x00, 0xF1, 0x55, 0x60, 0x01]);
    assert_eq!(chip8.tick().unwrap().opcode, Opcode::Unknown);
    assert_eq!(chip8.tick().unwrap().opcode, Opcode::Unknown);
    chip8.tick().unwrap();

    assert_eq!(chip8.pc(), 0x206);
    assert_eq!(chip8.register(Register::V0), 1);
}

#[test]
fn loaded_rom_leaves_rest_of_memory_alone() {
    let rom: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let chip8 = engine_with(&rom);
    let memory = chip8.memory().as_slice();

    assert_eq!(memory.len(), MEM_SIZE);
    assert_eq!(&memory[..FONT_DATA.len()], &FONT_DATA);
    assert!(memory[FONT_DATA.len()..0x200].iter().all(|&b| b == 0));
    assert_eq!(&memory[0x200..0x200 + rom.len()], rom.as_slice());
    assert!(memory[0x200 + rom.len()..].iter().all(|&b| b == 0));
    assert_eq!(chip8.rom_size(), 1000);
}

#[test]
fn oversized_rom_is_rejected() {
    let mut chip8 = Chip8::with_seed(7);
    let err = chip8.load_program(&vec![0; MAX_ROM_SIZE + 1]).unwrap_err();
    assert!(err.is_load_error());
    assert!(matches!(err, Error::RomTooLarge { .. }));
}

#[test]
fn draw_at_far_corner_faults() {
    // V0 = 63, V1 = 31, I = glyph "0": only the first lit pixel fits.
    let mut chip8 = engine_with(&[0x60, 0x3F, 0x61, 0x1F, 0xA0, 0x00, 0xD0, 0x15]);
    for _ in 0..3 {
        chip8.tick().unwrap();
    }

    let err = chip8.tick().unwrap_err();
    assert!(matches!(err, Error::DisplayOutOfBounds { .. }));
    assert_eq!(chip8.framebuffer().lit_count(), 0);
    assert_eq!(chip8.pc(), 0x206);
    assert_eq!(pixels(&chip8).len(), DISPLAY_HEIGHT);
    assert_eq!(pixels(&chip8)[0].len(), DISPLAY_WIDTH);
}
