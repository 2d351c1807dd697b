// Copyright (c) 2022 Bastiaan Marinus van de Weerd

//! NOTE: The “device” of this module is also used in `day19` and `day21`;
//! for that reason:
//! - various items are `pub(crate)`;
//! - the register file size is a const generic (four registers here, six
//!   in the other days);
//! - `Cpu` can bind its instruction pointer to a register;
//! - `Cpu` exposes single stepping and the next instruction, so that
//!   callers can observe a running program.

use std::fmt::{self, Debug, Display};


pub(crate) type Num = i64;

macro_rules! ops { ( $( $op:ident $mnemonic:literal ),+ $(,)? ) => {
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
	pub(crate) enum Op { $( $op ),+ }

	impl Op {
		pub(crate) const ALL: [Op; 16] = [ $( Op::$op ),+ ];

		pub(crate) fn mnemonic(&self) -> &'static str {
			match self { $( Op::$op => $mnemonic ),+ }
		}
	}
} }

ops! {
	Addr "addr", Addi "addi",
	Mulr "mulr", Muli "muli",
	Banr "banr", Bani "bani",
	Borr "borr", Bori "bori",
	Setr "setr", Seti "seti",
	Gtir "gtir", Gtri "gtri", Gtrr "gtrr",
	Eqir "eqir", Eqri "eqri", Eqrr "eqrr",
}

impl Display for Op {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.mnemonic())
	}
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum Fault {
	#[error("register {0} is outside the register file")]
	Register(Num),
	#[error("`{0}` overflowed")]
	Overflow(Op),
}

impl Op {
	/// Writes the result into register `c`; leaves `regs` untouched on a fault.
	pub(crate) fn try_apply(self, [a, b, c]: [Num; 3], regs: &mut [Num]) -> Result<(), Fault> {
		use Op::*;

		let r = |r: Num| usize::try_from(r).ok()
			.and_then(|r| regs.get(r).copied())
			.ok_or(Fault::Register(r));
		let overflow = || Fault::Overflow(self);

		let num = match self {
			Addr => r(a)?.checked_add(r(b)?).ok_or_else(overflow)?,
			Addi => r(a)?.checked_add(b).ok_or_else(overflow)?,
			Mulr => r(a)?.checked_mul(r(b)?).ok_or_else(overflow)?,
			Muli => r(a)?.checked_mul(b).ok_or_else(overflow)?,
			Banr => r(a)? & r(b)?,
			Bani => r(a)? & b,
			Borr => r(a)? | r(b)?,
			Bori => r(a)? | b,
			Setr => r(a)?,
			Seti => a,
			Gtir => Num::from(a > r(b)?),
			Gtri => Num::from(r(a)? > b),
			Gtrr => Num::from(r(a)? > r(b)?),
			Eqir => Num::from(a == r(b)?),
			Eqri => Num::from(r(a)? == b),
			Eqrr => Num::from(r(a)? == r(b)?),
		};

		let dest = usize::try_from(c).ok()
			.filter(|&c| c < regs.len())
			.ok_or(Fault::Register(c))?;
		regs[dest] = num;
		Ok(())
	}
}


/// `O` is `Op` once decoded, or the raw numeric opcode (`u8`) before that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Instr<O = Op> {
	pub(crate) op: O,
	pub(crate) a: Num,
	pub(crate) b: Num,
	pub(crate) c: Num,
}

impl<O> Instr<O> {
	pub(crate) fn args(&self) -> [Num; 3] {
		[self.a, self.b, self.c]
	}
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Program {
	pub(crate) ip_reg: Option<usize>,
	pub(crate) instrs: Vec<Instr>,
}

impl Program {
	pub(crate) fn cpu<const N: usize>(&self, regs: [Num; N]) -> Result<Cpu<'_, N>, Fault> {
		Cpu::new(&self.instrs, self.ip_reg, regs)
	}
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Halt {
	/// The instruction pointer left the program.
	Exit,
	Fault { at: usize, fault: Fault },
}

#[derive(Clone)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct Cpu<'p, const N: usize> {
	program: &'p [Instr],
	ip_reg: Option<usize>,
	ip: usize,
	pub(crate) regs: [Num; N],
	pub(crate) steps: u64,
	halt: Option<Halt>,
}

impl<'p, const N: usize> Cpu<'p, N> {
	pub(crate) fn new(program: &'p [Instr], ip_reg: Option<usize>, regs: [Num; N]) -> Result<Self, Fault> {
		if let Some(r) = ip_reg.filter(|&r| r >= N) { return Err(Fault::Register(r as Num)) }
		Ok(Self { program, ip_reg, ip: 0, regs, steps: 0, halt: None })
	}

	/// `None` once the instruction pointer is outside the program.
	pub(crate) fn next_instr(&self) -> Option<(usize, &'p Instr)> {
		let ip = match self.ip_reg {
			Some(r) => usize::try_from(self.regs[r]).ok()?,
			None => self.ip,
		};
		self.program.get(ip).map(|instr| (ip, instr))
	}

	pub(crate) fn try_step(&mut self) -> Result<(), Halt> {
		if let Some(halt) = self.halt { return Err(halt) }

		let result = match self.next_instr() {
			None => Err(Halt::Exit),
			Some((at, instr)) => instr.op.try_apply(instr.args(), &mut self.regs)
				.map_err(|fault| Halt::Fault { at, fault }),
		};
		if let Err(halt) = result {
			self.halt = Some(halt);
			return Err(halt)
		}

		match self.ip_reg {
			// Saturating keeps a jump to `Num::MAX` outside the program.
			Some(r) => self.regs[r] = self.regs[r].saturating_add(1),
			None => self.ip += 1,
		}
		self.steps += 1;
		Ok(())
	}

	pub(crate) fn run(&mut self) -> Halt {
		loop {
			if let Err(halt) = self.try_step() { return halt }
		}
	}
}

pub(crate) fn run<const N: usize>(
	instrs: &[Instr],
	regs: [Num; N],
	ip_reg: Option<usize>
) -> Result<([Num; N], Halt), Fault> {
	let mut cpu = Cpu::new(instrs, ip_reg, regs)?;
	let halt = cpu.run();
	Ok((cpu.regs, halt))
}


#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct OpSet(u16);

impl OpSet {
	pub(crate) const EMPTY: Self = OpSet(0);
	pub(crate) const ALL: Self = OpSet(u16::MAX);

	fn bit(op: Op) -> u16 {
		1 << op as u16
	}

	pub(crate) fn contains(&self, op: Op) -> bool {
		self.0 & Self::bit(op) != 0
	}

	pub(crate) fn insert(&mut self, op: Op) {
		self.0 |= Self::bit(op);
	}

	pub(crate) fn len(&self) -> usize {
		self.0.count_ones() as usize
	}

	pub(crate) fn single(&self) -> Option<Op> {
		(self.len() == 1).then(|| Op::ALL[self.0.trailing_zeros() as usize])
	}

	pub(crate) fn iter(self) -> impl Iterator<Item = Op> {
		Op::ALL.into_iter().filter(move |&op| self.contains(op))
	}
}

impl std::ops::BitOr for OpSet {
	type Output = Self;
	fn bitor(self, rhs: Self) -> Self::Output { OpSet(self.0 | rhs.0) }
}

impl std::ops::BitAnd for OpSet {
	type Output = Self;
	fn bitand(self, rhs: Self) -> Self::Output { OpSet(self.0 & rhs.0) }
}

impl std::ops::Sub for OpSet {
	type Output = Self;
	fn sub(self, rhs: Self) -> Self::Output { OpSet(self.0 & !rhs.0) }
}

impl FromIterator<Op> for OpSet {
	fn from_iter<I: IntoIterator<Item = Op>>(iter: I) -> Self {
		iter.into_iter().fold(OpSet::EMPTY, |mut set, op| { set.insert(op); set })
	}
}

impl Debug for OpSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter().map(|op| op.mnemonic())).finish()
	}
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Sample {
	pub(crate) before: [Num; 4],
	pub(crate) instr: Instr<u8>,
	pub(crate) after: [Num; 4],
}

impl Sample {
	pub(crate) fn matching_ops(&self) -> OpSet {
		Op::ALL.into_iter()
			.filter(|op| {
				let mut regs = self.before;
				op.try_apply(self.instr.args(), &mut regs).is_ok() && regs == self.after
			})
			.collect()
	}
}


#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ResolveError {
	#[error("opcode {0} is not one of the 16 opcodes")]
	Code(u8),
	#[error("no op is consistent with every sample of opcode {0}")]
	Exhausted(u8),
	#[error("opcode {code} is still ambiguous between {candidates:?}")]
	Ambiguous { code: u8, candidates: OpSet },
	#[error("`{0}` was resolved for more than one opcode")]
	Conflict(Op),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpTable(pub(crate) [Op; 16]);

impl OpTable {
	pub(crate) fn decode(&self, Instr { op, a, b, c }: Instr<u8>) -> Result<Instr, ResolveError> {
		let op = *self.0.get(op as usize).ok_or(ResolveError::Code(op))?;
		Ok(Instr { op, a, b, c })
	}
}

/// Per numeric opcode, the ops not yet ruled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidates([OpSet; 16]);

impl Default for Candidates {
	fn default() -> Self {
		Candidates([OpSet::ALL; 16])
	}
}

impl Candidates {
	/// Prunes the ops that disagree with `sample` and returns how many agreed.
	pub(crate) fn observe(&mut self, sample: &Sample) -> Result<usize, ResolveError> {
		let code = sample.instr.op;
		let set = self.0.get_mut(code as usize).ok_or(ResolveError::Code(code))?;
		let matching = sample.matching_ops();
		*set = *set & matching;
		Ok(matching.len())
	}

	pub(crate) fn is_resolved(&self) -> bool {
		self.0.iter().all(|set| set.len() == 1)
	}

	/// Removes every resolved op from the still ambiguous codes. Returns
	/// whether anything changed.
	pub(crate) fn eliminate_once(&mut self) -> bool {
		let resolved = self.0.iter()
			.filter(|set| set.len() == 1)
			.fold(OpSet::EMPTY, |acc, &set| acc | set);
		let mut changed = false;
		for set in self.0.iter_mut().filter(|set| set.len() > 1) {
			let pruned = *set - resolved;
			changed |= pruned != *set;
			*set = pruned;
		}
		changed
	}

	pub(crate) fn eliminate(&mut self) -> Result<(), ResolveError> {
		while !self.is_resolved() {
			if let Some(code) = self.0.iter().position(|set| set.len() == 0) {
				return Err(ResolveError::Exhausted(code as u8))
			}
			if !self.eliminate_once() {
				let code = self.0.iter().position(|set| set.len() > 1).unwrap_or_default();
				return Err(ResolveError::Ambiguous { code: code as u8, candidates: self.0[code] })
			}
		}
		Ok(())
	}

	pub(crate) fn into_table(self) -> Result<OpTable, ResolveError> {
		let mut table = [Op::Addr; 16];
		let mut seen = OpSet::EMPTY;
		for (code, candidates) in self.0.into_iter().enumerate() {
			let code = code as u8;
			let op = match candidates.len() {
				0 => return Err(ResolveError::Exhausted(code)),
				1 => candidates.single().ok_or(ResolveError::Exhausted(code))?,
				_ => return Err(ResolveError::Ambiguous { code, candidates }),
			};
			if seen.contains(op) { return Err(ResolveError::Conflict(op)) }
			seen.insert(op);
			table[code as usize] = op;
		}
		Ok(OpTable(table))
	}
}

pub(crate) fn resolve_opcodes<'s>(samples: impl IntoIterator<Item = &'s Sample>) -> Result<OpTable, ResolveError> {
	let mut candidates = Candidates::default();
	for sample in samples {
		candidates.observe(sample)?;
	}
	candidates.eliminate()?;
	candidates.into_table()
}


fn input() -> (Vec<Sample>, Vec<Instr<u8>>) {
	parsing::input_from_str(include_str!("day16.txt")).unwrap()
}


pub(crate) fn part1() -> usize {
	let (samples, _) = input();
	samples.iter()
		.filter(|sample| sample.matching_ops().len() >= 3)
		.count()
}


pub(crate) fn part2() -> Num {
	let (samples, program) = input();
	let table = resolve_opcodes(&samples).unwrap();
	let instrs = program.into_iter()
		.map(|instr| table.decode(instr))
		.collect::<Result<Vec<_>, _>>()
		.unwrap();
	match run(&instrs, [0; 4], None).unwrap() {
		(regs, Halt::Exit) => regs[0],
		(_, Halt::Fault { at, fault }) => panic!("Unexpected fault at instruction {at}: {fault}"),
	}
}


pub(crate) mod parsing {
	use super::{Num, Op, Instr, Program, Sample};
	use std::{num::ParseIntError, str::FromStr};
	use itertools::Itertools as _;

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) struct OpError(String);

	impl FromStr for Op {
		type Err = OpError;
		fn from_str(s: &str) -> Result<Self, Self::Err> {
			Op::ALL.into_iter()
				.find(|op| op.mnemonic() == s)
				.ok_or_else(|| OpError(s.to_string()))
		}
	}

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum InstrError<E> {
		Format,
		Op(E),
		Arg(usize, ParseIntError),
	}

	impl<O> FromStr for Instr<O> where O: FromStr {
		type Err = InstrError<O::Err>;
		fn from_str(s: &str) -> Result<Self, Self::Err> {
			let (op, a, b, c) = s.split_whitespace()
				.collect_tuple()
				.ok_or(InstrError::Format)?;
			let arg = |pos: usize, arg: &str| -> Result<Num, Self::Err> {
				arg.parse().map_err(|e| InstrError::Arg(pos, e))
			};
			Ok(Instr {
				op: op.parse().map_err(InstrError::Op)?,
				a: arg(0, a)?,
				b: arg(1, b)?,
				c: arg(2, c)?,
			})
		}
	}

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum SampleError {
		Format,
		Reg(ParseIntError),
		Instr(InstrError<ParseIntError>),
		Code(u8),
	}

	fn regs_from_str(s: &str, label: &str) -> Result<[Num; 4], SampleError> {
		let list = s.strip_prefix(label)
			.map(str::trim)
			.and_then(|s| s.strip_prefix('['))
			.and_then(|s| s.strip_suffix(']'))
			.ok_or(SampleError::Format)?;
		let regs = list.split(',')
			.map(|r| r.trim().parse())
			.collect::<Result<Vec<Num>, _>>()
			.map_err(SampleError::Reg)?;
		regs.try_into().map_err(|_| SampleError::Format)
	}

	impl FromStr for Sample {
		type Err = SampleError;
		fn from_str(s: &str) -> Result<Self, Self::Err> {
			let (before, instr, after) = s.lines()
				.collect_tuple()
				.ok_or(SampleError::Format)?;
			let instr: Instr<u8> = instr.parse().map_err(SampleError::Instr)?;
			if instr.op as usize >= Op::ALL.len() { return Err(SampleError::Code(instr.op)) }
			Ok(Sample {
				before: regs_from_str(before, "Before:")?,
				instr,
				after: regs_from_str(after, "After:")?,
			})
		}
	}

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum InputError {
		Format,
		Sample { index: usize, source: SampleError },
		Instr { line: usize, source: InstrError<ParseIntError> },
	}

	pub(crate) fn input_from_str(s: &str) -> Result<(Vec<Sample>, Vec<Instr<u8>>), InputError> {
		let (samples, program) = s.split_once("\n\n\n\n").ok_or(InputError::Format)?;
		let samples = samples.split("\n\n")
			.map(str::trim)
			.filter(|block| !block.is_empty())
			.enumerate()
			.map(|(index, block)| block.parse()
				.map_err(|e| InputError::Sample { index, source: e }))
			.collect::<Result<Vec<Sample>, _>>()?;
		let program = program.lines()
			.enumerate()
			.filter(|(_, line)| !line.trim().is_empty())
			.map(|(l, line)| line.parse()
				.map_err(|e| InputError::Instr { line: l + 1, source: e }))
			.collect::<Result<Vec<Instr<u8>>, _>>()?;
		Ok((samples, program))
	}

	#[allow(dead_code)]
	#[derive(Debug)]
	pub(crate) enum ProgramError {
		IpReg(ParseIntError),
		Instr { line: usize, source: InstrError<OpError> },
	}

	impl FromStr for Program {
		type Err = ProgramError;
		fn from_str(s: &str) -> Result<Self, Self::Err> {
			let mut lines = s.lines().enumerate().peekable();
			let header = lines.peek().and_then(|&(_, line)| line.strip_prefix("#ip"));
			let ip_reg = match header {
				Some(reg) => {
					lines.next();
					Some(reg.trim().parse::<usize>().map_err(ProgramError::IpReg)?)
				}
				None => None,
			};
			let instrs = lines
				.filter(|(_, line)| !line.trim().is_empty())
				.map(|(l, line)| line.parse()
					.map_err(|e| ProgramError::Instr { line: l + 1, source: e }))
				.collect::<Result<Vec<Instr>, _>>()?;
			Ok(Program { ip_reg, instrs })
		}
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = indoc::indoc! { "
		Before: [3, 2, 1, 1]
		9 2 1 2
		After:  [3, 2, 2, 1]
	" };

	fn instr(op: Op, a: Num, b: Num, c: Num) -> Instr {
		Instr { op, a, b, c }
	}

	#[test]
	fn ops() {
		use Op::*;
		const EXPECTED: [(Op, [Num; 4]); 16] = [
			(Addr, [3, 2, 3, 1]), (Addi, [3, 2, 2, 1]),
			(Mulr, [3, 2, 2, 1]), (Muli, [3, 2, 1, 1]),
			(Banr, [3, 2, 0, 1]), (Bani, [3, 2, 1, 1]),
			(Borr, [3, 2, 3, 1]), (Bori, [3, 2, 1, 1]),
			(Setr, [3, 2, 1, 1]), (Seti, [3, 2, 2, 1]),
			(Gtir, [3, 2, 0, 1]), (Gtri, [3, 2, 0, 1]), (Gtrr, [3, 2, 0, 1]),
			(Eqir, [3, 2, 1, 1]), (Eqri, [3, 2, 1, 1]), (Eqrr, [3, 2, 0, 1]),
		];
		for (op, expected) in EXPECTED {
			let mut regs = [3, 2, 1, 1];
			op.try_apply([2, 1, 2], &mut regs).unwrap();
			assert_eq!(regs, expected, "{op}");
		}

		let mut regs = [3, 4, 0, 0];
		Addr.try_apply([0, 1, 2], &mut regs).unwrap();
		assert_eq!(regs, [3, 4, 7, 0]);

		let mut regs = [5, -3, 0, 0];
		Gtri.try_apply([1, -4, 3], &mut regs).unwrap();
		Gtir.try_apply([-4, 1, 2], &mut regs).unwrap();
		assert_eq!(regs, [5, -3, 0, 1]);
	}

	#[test]
	fn faults() {
		let mut regs = [1, 2, 3, 4];
		assert_eq!(Op::Addr.try_apply([4, 0, 0], &mut regs), Err(Fault::Register(4)));
		assert_eq!(Op::Setr.try_apply([-1, 0, 0], &mut regs), Err(Fault::Register(-1)));
		assert_eq!(Op::Seti.try_apply([7, 0, 4], &mut regs), Err(Fault::Register(4)));
		assert_eq!(regs, [1, 2, 3, 4]);

		// Immediate operands are never bounds-checked.
		assert_eq!(Op::Addi.try_apply([0, 99, 1], &mut regs), Ok(()));
		assert_eq!(regs, [1, 100, 3, 4]);

		let mut regs = [Num::MAX, 2, 0, 0];
		assert_eq!(Op::Mulr.try_apply([0, 1, 2], &mut regs), Err(Fault::Overflow(Op::Mulr)));
		assert_eq!(Op::Addi.try_apply([0, 1, 2], &mut regs), Err(Fault::Overflow(Op::Addi)));
		assert_eq!(regs, [Num::MAX, 2, 0, 0]);
	}

	#[test]
	fn mnemonics() {
		for op in Op::ALL {
			assert_eq!(op.to_string().parse::<Op>().ok(), Some(op));
		}
		assert!("nope".parse::<Op>().is_err());
		assert_eq!("seti 5 0 1".parse::<Instr>().ok(), Some(instr(Op::Seti, 5, 0, 1)));
		assert!(matches!("seti 5 0".parse::<Instr>(), Err(parsing::InstrError::Format)));
		assert!(matches!("seti 5 x 1".parse::<Instr>(), Err(parsing::InstrError::Arg(1, _))));
	}

	#[test]
	fn linear() {
		let program = [
			instr(Op::Seti, 7, 0, 0),
			instr(Op::Muli, 0, 3, 1),
			instr(Op::Gtrr, 1, 0, 2),
			instr(Op::Eqri, 2, 1, 3),
		];
		let (regs, halt) = run(&program, [0; 4], None).unwrap();
		assert_eq!(halt, Halt::Exit);
		assert_eq!(regs, [7, 21, 1, 1]);
		assert_eq!(run(&program, [0; 4], None).unwrap(), (regs, halt));

		let (regs, halt) = run(&[], [1, 2, 3, 4], None).unwrap();
		assert_eq!((regs, halt), ([1, 2, 3, 4], Halt::Exit));
	}

	#[test]
	fn ip_reg() {
		let program = [instr(Op::Seti, 5, 0, 0)];
		let mut cpu = Cpu::new(&program, Some(0), [0; 4]).unwrap();
		assert_eq!(cpu.run(), Halt::Exit);
		assert_eq!(cpu.regs, [6, 0, 0, 0]);
		assert_eq!(cpu.steps, 1);
		assert_eq!(cpu.try_step(), Err(Halt::Exit));

		let program: Program = indoc::indoc! { "
			#ip 0
			seti 5 0 1
			seti 6 0 2
			addi 0 1 0
			addr 1 2 3
			setr 1 0 0
			seti 8 0 4
			seti 9 0 5
		" }.parse().unwrap();
		assert_eq!(program.ip_reg, Some(0));
		assert_eq!(program.instrs.len(), 7);
		let mut cpu = program.cpu([0; 6]).unwrap();
		assert_eq!(cpu.next_instr(), Some((0, &program.instrs[0])));
		assert_eq!(cpu.run(), Halt::Exit);
		assert_eq!(cpu.regs, [7, 5, 6, 0, 0, 9]);
		assert_eq!(cpu.steps, 5);
		assert_eq!(cpu.next_instr(), None);

		// A negative pointer is outside the program too.
		assert_eq!(run(&program.instrs, [-1, 0, 0, 0, 0, 0], Some(0)).unwrap().1, Halt::Exit);

		assert_eq!(Cpu::new(&program.instrs, Some(6), [0; 6]).err(), Some(Fault::Register(6)));
	}

	#[test]
	fn fault_halts() {
		let program = [instr(Op::Seti, 1, 0, 0), instr(Op::Addr, 9, 0, 0), instr(Op::Seti, 2, 0, 1)];
		let mut cpu = Cpu::new(&program, None, [0; 4]).unwrap();
		let fault = Halt::Fault { at: 1, fault: Fault::Register(9) };
		assert_eq!(cpu.run(), fault);
		assert_eq!(cpu.regs, [1, 0, 0, 0]);
		assert_eq!(cpu.try_step(), Err(fault));
	}

	#[test]
	fn samples() {
		let sample: Sample = SAMPLE.parse().unwrap();
		assert_eq!(sample.before, [3, 2, 1, 1]);
		assert_eq!(sample.instr, Instr { op: 9, a: 2, b: 1, c: 2 });
		assert_eq!(sample.after, [3, 2, 2, 1]);
		assert_eq!(sample.matching_ops(), [Op::Addi, Op::Mulr, Op::Seti].into_iter().collect::<OpSet>());
		assert!(matches!("Before: [3, 2, 1, 1]\n16 2 1 2\nAfter:  [3, 2, 2, 1]".parse::<Sample>(),
			Err(parsing::SampleError::Code(16))));
		assert!(matches!("Before: [3, 2, 1]\n9 2 1 2\nAfter:  [3, 2, 2, 1]".parse::<Sample>(),
			Err(parsing::SampleError::Format)));
	}

	#[test]
	fn tie() {
		use itertools::Itertools as _;
		let sample = Sample { before: [0; 4], instr: Instr { op: 0, a: 0, b: 0, c: 0 }, after: [0; 4] };
		let matching = sample.matching_ops();
		assert_eq!(matching.len(), 13);
		assert_eq!(matching.iter().filter(|op| op.mnemonic().starts_with("eq")).count(), 0);

		let mut candidates = Candidates::default();
		assert_eq!(candidates.observe(&sample), Ok(13));
		assert_eq!(candidates.0[0], matching);
		assert!(candidates.0[1..].iter().all_equal());

		let (mut samples, _) = input();
		let table = resolve_opcodes(&samples).unwrap();
		samples.push(sample);
		assert_eq!(resolve_opcodes(&samples), Ok(table));
	}

	#[test]
	fn elimination() {
		let mut candidates = Candidates(std::array::from_fn(|code| match code {
			0 => [Op::Addr].into_iter().collect(),
			1 => [Op::Addr, Op::Addi].into_iter().collect(),
			2 => [Op::Addr, Op::Addi, Op::Mulr].into_iter().collect(),
			code => [Op::ALL[code]].into_iter().collect(),
		}));
		assert!(candidates.eliminate_once());
		assert!(!candidates.is_resolved());
		assert_eq!(candidates.eliminate(), Ok(()));
		let resolved = candidates.clone();
		assert!(!candidates.eliminate_once());
		assert_eq!(candidates.eliminate(), Ok(()));
		assert_eq!(candidates, resolved);
		assert_eq!(candidates.into_table(), Ok(OpTable(Op::ALL)));

		let pair: OpSet = [Op::Addr, Op::Addi].into_iter().collect();
		let mut ambiguous = Candidates(std::array::from_fn(|code| match code {
			0 | 1 => pair,
			code => [Op::ALL[code]].into_iter().collect(),
		}));
		assert_eq!(ambiguous.eliminate(), Err(ResolveError::Ambiguous { code: 0, candidates: pair }));

		let mut exhausted = Candidates::default();
		exhausted.0[3] = OpSet::EMPTY;
		assert_eq!(exhausted.eliminate(), Err(ResolveError::Exhausted(3)));

		let conflicting = Candidates(std::array::from_fn(|code|
			[Op::ALL[code.max(1)]].into_iter().collect()));
		assert_eq!(conflicting.into_table(), Err(ResolveError::Conflict(Op::Addi)));

		let sample = Sample { before: [0; 4], instr: Instr { op: 16, a: 0, b: 0, c: 0 }, after: [0; 4] };
		assert_eq!(Candidates::default().observe(&sample), Err(ResolveError::Code(16)));
		assert_eq!(OpTable(Op::ALL).decode(sample.instr), Err(ResolveError::Code(16)));
	}

	#[test]
	fn tests() {
		use Op::*;
		let (samples, program) = input();
		assert_eq!(samples.len(), 64);
		assert_eq!(program.len(), 48);
		assert_eq!(resolve_opcodes(&samples), Ok(OpTable([
			Bani, Eqri, Eqir, Seti, Eqrr, Gtri, Mulr, Addi,
			Muli, Borr, Gtrr, Banr, Setr, Gtir, Bori, Addr,
		])));
		assert_eq!(part1(), 53);
		assert_eq!(part2(), 1944);
	}
}
