use sevenseg::{decode_batch, decode_puzzle, parse_input};

const SAMPLE: &str = "\
be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbe
edbfga begcd cbg gc gcadebf fbgde acbgfd abcde gfcbed gfec | fcgedb cgb dgebacf gc
fgaebd cg bdaec gdafb agbcfd gdcbef bgcad gfac gcb cdgabef | cg cg fdcagb cbg
fbegcd cbd adcefb dageb afcb bc aefdc ecdab fgdeca fcdbega | efabcd cedba gadfec cb
aecbfdg fbg gf bafeg dbefa fcge gcbea fcaegb dgceab fcbdga | gecf egdcabf bgf bfgea
fgeab ca afcebg bdacfeg cfaedg gcfdb baec bfadeg bafgc acf | gebdcfa ecba ca fadegcb
dbcfg fgd bdegcaf fgec aegbdf ecdfab fbedc dacgb gdcebf gf | cefg dcbef fcge gbcadfe
bdfegc cbegaf gecbf dfcage bdacg ed bedf ced adcbefg gebcd | ed bcgafe cdgba cbgef
egadfb cdbfeg cegd fecab cgb gbdefca cg fgcdab egfdb bfceg | gbdfcae bgc cg cgb
gcafb gcf dcaebfg ecagb gf abcdeg gaef cafbge fdbac fegbdc | fgae cfgab fg bagce
";

#[test]
fn test_sample_values() {
    let puzzles = parse_input(SAMPLE).expect("sample should parse");
    assert_eq!(puzzles.len(), 10);
    let values: Vec<u64> = puzzles
        .iter()
        .map(|p| decode_puzzle(p).expect("sample puzzle should decode").value)
        .collect();
    assert_eq!(
        values,
        vec![8394, 9781, 1197, 9361, 4873, 8418, 4548, 1625, 8717, 4315]
    );
}

#[test]
fn test_sample_report() {
    let puzzles = parse_input(SAMPLE).expect("sample should parse");
    let report = decode_batch(&puzzles);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.easy_digits, 26);
    assert_eq!(report.sum, 61229);
}

#[test]
fn test_sample_with_bad_puzzle() {
    let mut text = String::from(SAMPLE);
    // Repeats the 8 in place of the 0.
    text.push_str(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb bcdefga ab | cdfeb fcadb cdfeb cdbaf\n",
    );
    let puzzles = parse_input(&text).expect("sample should parse");
    let report = decode_batch(&puzzles);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, 10);
    assert_eq!(report.easy_digits, 26);
    assert_eq!(report.sum, 61229);
}
