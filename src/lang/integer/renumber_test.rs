use super::renumber::{Renumberer,flags};

fn test_renumber(test_code: &str,expected: &str,beg: usize,end: usize,first: usize,step: usize) {
	let mut renumberer = Renumberer::new();
	let actual = renumberer.renumber(test_code,beg,end,first,step).expect("renumber failed");
	assert_eq!(actual,String::from(expected));
}

fn test_move(test_code: &str,expected: &str,beg: usize,end: usize,first: usize,step: usize) {
	let mut renumberer = Renumberer::new();
	renumberer.set_flags(flags::REORDER);
	let actual = renumberer.renumber(test_code,beg,end,first,step).expect("renumber failed");
	assert_eq!(actual,String::from(expected) + "\n");
}

fn test_failure(test_code: &str,beg: usize,end: usize,first: usize,step: usize,flags: u64) {
	let mut renumberer = Renumberer::new();
	renumberer.set_flags(flags);
	assert!(renumberer.renumber(test_code,beg,end,first,step).is_err());
}

mod valid_cases {
    #[test]
	fn zero_start() {
		let test_code = "0 CALL -936\n20 PRINT X\n30 END";
		let expected = "100 CALL -936\n101 PRINT X\n102 END";
		super::test_renumber(test_code,expected,0,usize::MAX,100,1);
	}
    #[test]
	fn segment() {
		let test_code = "10 CALL -936\n20 INPUT X\n30 PRINT X\n40 END";
		let expected = "10 CALL -936\n27 INPUT X\n29 PRINT X\n40 END";
		super::test_renumber(test_code,expected,20,40,27,2);
	}
    #[test]
	fn references() {
		let test_code = "10 GOSUB 30\n20 IF X THEN 10\n30 GOTO 20: LIST 10,30\n";
		let expected = "100 GOSUB 120\n110 IF X THEN 100\n120 GOTO 110: LIST 100,120\n";
		super::test_renumber(test_code,expected,0,usize::MAX,100,10);
	}
    #[test]
	fn spaces_kept() {
		let test_code = "10  GOTO  20\n 20 END\n";
		let expected = "1  GOTO  2\n 2 END\n";
		super::test_renumber(test_code,expected,0,usize::MAX,1,1);
	}
    #[test]
	fn pass_over_refs() {
		let mut renumberer = super::Renumberer::new();
		renumberer.set_flags(super::flags::PASS_OVER_REFS);
		let actual = renumberer.renumber("10 GOTO 20\n20 END\n",0,usize::MAX,1,1).expect("renumber failed");
		assert_eq!(actual,"1 GOTO 20\n2 END\n");
	}
    #[test]
	fn external_ref_fixed() {
		let mut renumberer = super::Renumberer::new();
		renumberer.set_external_refs(vec![20]);
		let actual = renumberer.renumber("10 GOTO 20\n20 END\n30 GOTO 10\n",0,usize::MAX,10,1).expect("renumber failed");
		assert_eq!(actual,"10 GOTO 20\n20 END\n21 GOTO 10\n");
	}
}

mod invalid_cases {
    #[test]
	fn largest_num() {
		let test_code = "0 CALL -936\n20 PRINT X\n30 END";
		super::test_failure(test_code,0,usize::MAX,32762,3,0);
	}
    #[test]
	fn breaks_lower_bound() {
		let test_code = "10 CALL -936\n20 PRINT X\n30 END";
		super::test_failure(test_code,20,usize::MAX,9,1,0);
	}
    #[test]
	fn breaks_upper_bound() {
		let test_code = "10 CALL -936\n20 PRINT X\n30 END";
		super::test_failure(test_code,0,30,25,5,0);
	}
    #[test]
	fn breaks_max() {
		let test_code = "10 CALL -936\n20 PRINT X\n30 END";
		super::test_failure(test_code,0,usize::MAX,63800,100,0);
	}
    #[test]
	fn move_not_allowed() {
		let test_code = "0 CALL -936\n20 PRINT X\n30 END";
		super::test_failure(test_code,0,30,40,10,0);
	}
    #[test]
	fn empty_range() {
		let test_code = "10 CALL -936\n20 PRINT X\n30 END";
		super::test_failure(test_code,40,50,100,10,0);
	}
}

mod valid_moves {
    #[test]
	fn goto_variable() {
		let test_code = "0 CALL -936\n20 GOTO 30\n30 END\n40 GOTO X*10";
		let expected = "40 GOTO X*10\n100 CALL -936\n101 GOTO 102\n102 END";
		super::test_move(test_code,expected,0,40,100,1);
	}
    #[test]
	fn simple_move() {
		let test_code = "0 CALL -936\n20 PRINT X\n30 END";
		let expected = "30 END\n40 CALL -936\n50 PRINT X";
		super::test_move(test_code,expected,0,30,40,10);
	}
    #[test]
	fn inner_move() {
		let test_code = "10 CALL -936\n20 INPUT X\n30 PRINT X\n40 END";
		let expected = "10 CALL -936\n40 END\n1000 INPUT X\n1002 PRINT X";
		super::test_move(test_code,expected,20,40,1000,2);
	}
}
