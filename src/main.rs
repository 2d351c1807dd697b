// Copyright (c) 2022 Bastiaan Marinus van de Weerd

macro_rules! days { ( $( $day:literal ),+ ) => { paste::paste! {
	$( mod [<day $day>]; )+

	fn main() {
		$(
			println!("Day {}; part 1: {}, part 2: {}",
				$day, [<day $day>]::part1(), [<day $day>]::part2());
		)+
	}
} } }

days!(16, 19, 21);
