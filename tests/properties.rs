//! Property tests over masking, export/load round-trips and halt behavior.

use proptest::prelude::*;
use s12::cpu::{mask8, mask12};
use s12::image::{parse_image, render_memory};
use s12::{Addr, Cpu, Memory, Opcode, Registers, Step, Word};

fn arb_memory() -> impl Strategy<Value = Memory> {
    prop::collection::vec(0u16..=0xFFF, 256).prop_map(|cells| {
        let mut mem = Memory::new();
        for (i, value) in cells.into_iter().enumerate() {
            mem.write(Addr::from_u32(i as u32), Word::new(value));
        }
        mem
    })
}

fn arb_registers() -> impl Strategy<Value = Registers> {
    (any::<u8>(), 0u16..=0xFFF).prop_map(|(pc, acc)| Registers::with_values(Addr::new(pc), Word::new(acc)))
}

proptest! {
    #[test]
    fn masks_stay_in_range(value in any::<u32>()) {
        prop_assert!(mask12(value) <= 0xFFF);
        prop_assert!(u32::from(mask8(value)) <= 0xFF);
        prop_assert_eq!(Word::from_u32(value).value(), mask12(value));
    }

    #[test]
    fn export_then_load_is_identity(regs in arb_registers(), mem in arb_memory()) {
        let text = render_memory(&regs, &mem);
        let image = parse_image(&text);
        prop_assert_eq!(image.registers, regs);
        prop_assert_eq!(render_memory(&image.registers, &image.memory), text);
    }

    #[test]
    fn hex_and_binary_values_agree(addr in any::<u8>(), value in 0u16..=0xFFF) {
        let hex = parse_image(&format!("{:02X} {:03X}\n", addr, value));
        let bin = parse_image(&format!("{:02X} {:012b}\n", addr, value));
        prop_assert_eq!(hex.memory.read(Addr::new(addr)).value(), value);
        prop_assert_eq!(hex, bin);
    }

    #[test]
    fn add_wraps_mod_4096(acc in 0u16..=0xFFF, operand in 0u16..=0xFFF) {
        let mut cpu = Cpu::new();
        cpu.mem.write(Addr::new(0), Word::new(((Opcode::Add.bits() as u16) << 8) | 0x80));
        cpu.mem.write(Addr::new(0x80), Word::new(operand));
        cpu.regs.acc = Word::new(acc);
        cpu.step().unwrap();
        prop_assert_eq!(cpu.regs.acc.value(), (acc + operand) % 4096);
    }

    #[test]
    fn sub_wraps_mod_4096(acc in 0u16..=0xFFF, operand in 0u16..=0xFFF) {
        let mut cpu = Cpu::new();
        cpu.mem.write(Addr::new(0), Word::new(((Opcode::Sub.bits() as u16) << 8) | 0x80));
        cpu.mem.write(Addr::new(0x80), Word::new(operand));
        cpu.regs.acc = Word::new(acc);
        cpu.step().unwrap();
        prop_assert_eq!(cpu.regs.acc.value(), (acc + 4096 - operand) % 4096);
    }

    #[test]
    fn steps_after_halt_change_nothing(regs in arb_registers(), mem in arb_memory(), extra in 1usize..20) {
        let mut cpu = Cpu::from_parts(mem, regs);
        cpu.mem.write(regs.pc, Word::ZERO);
        cpu.step().unwrap();
        prop_assert!(cpu.is_halted());

        let regs_after = cpu.regs;
        let mem_after = cpu.mem.clone();
        for _ in 0..extra {
            prop_assert_eq!(cpu.step().unwrap(), Step::HALTED);
        }
        prop_assert_eq!(cpu.regs, regs_after);
        prop_assert_eq!(&cpu.mem, &mem_after);
        prop_assert_eq!(cpu.trace().len(), 1);
    }

    #[test]
    fn state_stays_in_range(mem in arb_memory(), steps in 1u64..200) {
        let mut cpu = Cpu::from_parts(mem, Registers::new());
        let _ = cpu.run_limited(steps);
        prop_assert!(cpu.regs.acc.value() <= 0xFFF);
        prop_assert!(cpu.mem.iter().all(|(_, w)| w.value() <= 0xFFF));
    }
}
