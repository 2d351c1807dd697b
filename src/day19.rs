// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use crate::day16::{Halt, Num, Program};


fn input_program() -> Program {
	include_str!("day19.txt").parse().unwrap()
}


/// The program sums the divisors of a number it computes first, then jumps
/// back to instruction 1. That number ends up as the largest register.
fn divisor_target(program: &Program, r0: Num) -> Result<Num, Halt> {
	let mut cpu = program.cpu([r0, 0, 0, 0, 0, 0])
		.map_err(|fault| Halt::Fault { at: 0, fault })?;
	cpu.try_step()?;
	while cpu.next_instr().map(|(ip, _)| ip) != Some(1) {
		cpu.try_step()?;
	}
	Ok(cpu.regs.into_iter().max().unwrap_or_default())
}

fn divisor_sum(n: Num) -> Num {
	use num_integer::{Integer, Roots as _};
	(1..=n.sqrt())
		.filter(|d| Integer::is_multiple_of(&n, d))
		.map(|d| if d * d == n { d } else { d + n / d })
		.sum()
}


pub(crate) fn part1() -> Num {
	let program = input_program();
	let mut cpu = program.cpu([0; 6]).unwrap();
	match cpu.run() {
		Halt::Exit => cpu.regs[0],
		Halt::Fault { at, fault } => panic!("Unexpected fault at instruction {at}: {fault}"),
	}
}


pub(crate) fn part2() -> Num {
	divisor_sum(divisor_target(&input_program(), 1).unwrap())
}


#[test]
fn tests() {
	assert_eq!(divisor_sum(1), 1);
	assert_eq!(divisor_sum(16), 31);
	assert_eq!(divisor_sum(836), 1680);

	let program = input_program();
	assert_eq!(program.ip_reg, Some(3));
	assert_eq!(program.instrs.len(), 32);
	let mut cpu = program.cpu([0; 6]).unwrap();
	assert_eq!(cpu.run(), Halt::Exit);
	assert_eq!(cpu.regs, [1680, 837, 836, 257, 1, 837]);
	assert_eq!(cpu.steps, 5594520);

	assert_eq!(divisor_target(&program, 0), Ok(836));
	assert_eq!(divisor_target(&program, 1), Ok(5881620));
	assert_eq!(part1(), 1680);
	assert_eq!(part2(), 16748928);
}
