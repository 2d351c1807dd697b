// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use std::collections::HashSet;
use crate::day16::{Cpu, Fault, Instr, Num, Op, Program};


#[derive(Debug, thiserror::Error)]
enum ProbeError {
	#[error("no `eqrr` compares register 0 with another register")]
	NoComparison,
	#[error(transparent)]
	Fault(#[from] Fault),
}

/// Yields the value register 0 is compared against, every time the program
/// compares it. The program halts on the first value equal to register 0.
struct Probe<'p> {
	cpu: Cpu<'p, 6>,
	at: usize,
	reg: usize,
}

impl<'p> Probe<'p> {
	fn new(program: &'p Program, r0: Num) -> Result<Self, ProbeError> {
		let (at, reg) = program.instrs.iter()
			.enumerate()
			.find_map(|(at, instr)| match *instr {
				Instr { op: Op::Eqrr, a: 0, b: reg, .. }
				| Instr { op: Op::Eqrr, a: reg, b: 0, .. } if reg != 0 => Some((at, reg)),
				_ => None,
			})
			.ok_or(ProbeError::NoComparison)?;
		let reg = usize::try_from(reg).ok()
			.filter(|&reg| reg < 6)
			.ok_or(Fault::Register(reg))?;
		Ok(Probe { cpu: program.cpu([r0, 0, 0, 0, 0, 0])?, at, reg })
	}
}

impl Iterator for Probe<'_> {
	type Item = Num;
	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let (ip, _) = self.cpu.next_instr()?;
			let value = (ip == self.at).then(|| self.cpu.regs[self.reg]);
			self.cpu.try_step().ok()?;
			if value.is_some() { return value }
		}
	}
}


fn input_program() -> Program {
	include_str!("day21.txt").parse().unwrap()
}


/// Register 0 value that halts after the fewest instructions.
pub(crate) fn part1() -> Num {
	Probe::new(&input_program(), 0).unwrap()
		.next().unwrap()
}


/// Register 0 value that halts after the most instructions: the last new
/// value before the compared values start repeating.
pub(crate) fn part2() -> Num {
	let mut seen = HashSet::new();
	Probe::new(&input_program(), 0).unwrap()
		.take_while(|value| seen.insert(*value))
		.last().unwrap()
}


#[test]
fn tests() {
	use crate::day16::Halt;

	let program = input_program();
	let probe = Probe::new(&program, 0).unwrap();
	assert_eq!((probe.at, probe.reg), (10, 4));

	let mut seen = HashSet::new();
	assert_eq!(Probe::new(&program, 0).unwrap().take_while(|value| seen.insert(*value)).count(), 2048);

	assert_eq!(part1(), 3335);
	assert_eq!(part2(), 256);

	for (r0, steps) in [(part1(), 11), (part2(), 14340)] {
		let mut cpu = program.cpu([r0, 0, 0, 0, 0, 0]).unwrap();
		assert_eq!(cpu.run(), Halt::Exit);
		assert_eq!(cpu.steps, steps);
		assert_eq!(cpu.regs[0], r0);
	}

	// The first compared value halts the probe itself.
	assert_eq!(Probe::new(&program, 3335).unwrap().collect::<Vec<_>>(), [3335]);

	let program: Program = "#ip 1\nseti 0 0 4".parse().unwrap();
	assert!(matches!(Probe::new(&program, 0), Err(ProbeError::NoComparison)));
	let program: Program = "#ip 1\neqrr 0 7 3".parse().unwrap();
	assert!(matches!(Probe::new(&program, 0), Err(ProbeError::Fault(Fault::Register(7)))));
}
