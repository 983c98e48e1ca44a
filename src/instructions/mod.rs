//! # Instruction Implementations
//!
//! This module contains the implementations of all instructions, organized by category.
//! Each instruction is a standalone function that takes a mutable reference to the CPU
//! and the addressing mode of the decoded descriptor. By the time it runs, the opcode
//! byte has already been consumed; operand bytes are consumed by the instruction.
//!
//! ## Categories
//!
//! - **alu**: Arithmetic and logic operations (ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT)
//! - **branches**: Conditional branch instructions (BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS)
//! - **shifts**: Shift and rotate operations (ASL, LSR, ROL, ROR)
//! - **load_store**: Load and store instructions (LDA, LDX, LDY, STA, STX, STY)
//! - **inc_dec**: Increment and decrement operations (INC, DEC, INX, INY, DEX, DEY)
//! - **control**: Control flow instructions (JMP, JSR, RTS, NOP)
//! - **stack**: Stack operations (PHA, PHP, PLA, PLP)
//! - **flags**: Status flag manipulation (CLC, SEC, CLD, SED, CLV)
//! - **transfer**: Register transfer operations (TAX, TAY, TXA, TYA, TSX, TXS)

pub(crate) mod alu;
pub(crate) mod branches;
pub(crate) mod control;
pub(crate) mod flags;
pub(crate) mod inc_dec;
pub(crate) mod load_store;
pub(crate) mod shifts;
pub(crate) mod stack;
pub(crate) mod transfer;

use crate::opcodes::{InstructionDescriptor, Operation};
use crate::{Cpu, ExecutionError, StatusFlags};

/// Runs the behavior of `descriptor`. PC points just past the opcode byte.
pub(crate) fn execute(
    cpu: &mut Cpu,
    descriptor: &InstructionDescriptor,
) -> Result<(), ExecutionError> {
    let mode = descriptor.mode;

    match descriptor.operation {
        Operation::Adc => alu::execute_adc(cpu, mode),
        Operation::Sbc => alu::execute_sbc(cpu, mode),
        Operation::And => alu::execute_and(cpu, mode),
        Operation::Ora => alu::execute_ora(cpu, mode),
        Operation::Eor => alu::execute_eor(cpu, mode),
        Operation::Cmp => alu::execute_cmp(cpu, mode),
        Operation::Cpx => alu::execute_cpx(cpu, mode),
        Operation::Cpy => alu::execute_cpy(cpu, mode),
        Operation::Bit => alu::execute_bit(cpu, mode),

        Operation::Bcc => branches::branch_if(cpu, StatusFlags::CARRY, false),
        Operation::Bcs => branches::branch_if(cpu, StatusFlags::CARRY, true),
        Operation::Bne => branches::branch_if(cpu, StatusFlags::ZERO, false),
        Operation::Beq => branches::branch_if(cpu, StatusFlags::ZERO, true),
        Operation::Bpl => branches::branch_if(cpu, StatusFlags::NEGATIVE, false),
        Operation::Bmi => branches::branch_if(cpu, StatusFlags::NEGATIVE, true),
        Operation::Bvc => branches::branch_if(cpu, StatusFlags::OVERFLOW, false),
        Operation::Bvs => branches::branch_if(cpu, StatusFlags::OVERFLOW, true),

        Operation::Clc => flags::set(cpu, StatusFlags::CARRY, false),
        Operation::Sec => flags::set(cpu, StatusFlags::CARRY, true),
        Operation::Cld => flags::set(cpu, StatusFlags::DECIMAL, false),
        Operation::Sed => flags::set(cpu, StatusFlags::DECIMAL, true),
        Operation::Clv => flags::set(cpu, StatusFlags::OVERFLOW, false),

        Operation::Inc => inc_dec::execute_inc(cpu, mode),
        Operation::Dec => inc_dec::execute_dec(cpu, mode),
        Operation::Inx => inc_dec::execute_inx(cpu),
        Operation::Iny => inc_dec::execute_iny(cpu),
        Operation::Dex => inc_dec::execute_dex(cpu),
        Operation::Dey => inc_dec::execute_dey(cpu),

        Operation::Jmp => control::execute_jmp(cpu, mode),
        Operation::Jsr => control::execute_jsr(cpu),
        Operation::Rts => control::execute_rts(cpu),
        Operation::Nop => Ok(()),

        Operation::Lda => load_store::execute_lda(cpu, mode),
        Operation::Ldx => load_store::execute_ldx(cpu, mode),
        Operation::Ldy => load_store::execute_ldy(cpu, mode),
        Operation::Sta => load_store::execute_sta(cpu, mode),
        Operation::Stx => load_store::execute_stx(cpu, mode),
        Operation::Sty => load_store::execute_sty(cpu, mode),

        Operation::Asl => shifts::execute_asl(cpu, mode),
        Operation::Lsr => shifts::execute_lsr(cpu, mode),
        Operation::Rol => shifts::execute_rol(cpu, mode),
        Operation::Ror => shifts::execute_ror(cpu, mode),

        Operation::Pha => stack::execute_pha(cpu),
        Operation::Php => stack::execute_php(cpu),
        Operation::Pla => stack::execute_pla(cpu),
        Operation::Plp => stack::execute_plp(cpu),

        Operation::Tax => transfer::execute_tax(cpu),
        Operation::Tay => transfer::execute_tay(cpu),
        Operation::Txa => transfer::execute_txa(cpu),
        Operation::Tya => transfer::execute_tya(cpu),
        Operation::Tsx => transfer::execute_tsx(cpu),
        Operation::Txs => transfer::execute_txs(cpu),

        Operation::Dcb | Operation::Invalid => Err(ExecutionError::InvalidOpcode {
            opcode: descriptor.opcode,
            address: cpu.pc.wrapping_sub(1),
        }),
    }
}
