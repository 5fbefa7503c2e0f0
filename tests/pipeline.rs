//! End-to-end scenarios over the library API: source text in, PRISM text
//! out.

use probity::parser::{parse, parse_reftype};
use probity::pctl::translate_to_pctl;
use probity::translate::translate_to_mdp;

#[test]
fn arithmetic_parses_to_the_expected_shape() {
    let expr = parse("1 +(2+3*4) - 3").expect("parses");
    assert_eq!(expr.to_string(), "Sub(Add(1, Add(2, Mul(3, 4))), 3)");
}

#[test]
fn simple_typing_accepts_an_if_over_integers() {
    let expr = parse("if true then 42 else 1").expect("parses");
    let ty = probity::simple_typing(&expr).expect("well typed");
    assert_eq!(*ty, probity::SimpleType::Int);
}

#[test]
fn integer_literal_translates_to_a_constant_only_module() {
    let expr = parse("42").expect("parses");
    let result = translate_to_mdp(&expr).expect("translates");
    assert_eq!(result.init, 0);
    assert_eq!(result.accept, 0);
    assert_eq!(result.value.name, "c42");
    assert_eq!(
        result.mdp.to_string(),
        "mdp\n\
         \n\
         module default\n\
         \n\
         c42 : [42 .. 43] init 42;\n\
         \n\
         \n\
         endmodule"
    );
}

#[test]
fn rand_translates_to_a_two_branch_command() {
    let expr = parse("rand(1,2)").expect("parses");
    let result = translate_to_mdp(&expr).expect("translates");
    assert_eq!(result.init, 0);
    assert_eq!(result.accept, 1);
    assert_eq!(result.value.name, "v0");
    assert_eq!(
        result.mdp.to_string(),
        "mdp\n\
         \n\
         module default\n\
         \n\
         location : [0..1] init 0;\n\
         v0 : [1..2] init 1;\n\
         \n\
         [] (location=0) -> 1/2 : (location'=1)&(v0'=1)+1/2 : (location'=1)&(v0'=2);\n\
         \n\
         endmodule"
    );
}

#[test]
fn refinement_becomes_a_pmin_reachability_property() {
    // let a = rand(0,1) in a : {x:int | Prob(x=0) = 1/2}, checked the way
    // the driver would: the ascribed variable wrapped in its binding.
    let program = parse("let a = rand(0,1) in a").expect("parses");
    let ty = parse_reftype("{x:int | Prob(x=0) = 1/2}").expect("parses");
    let translated = translate_to_mdp(&program).expect("translates");
    let pctl = translate_to_pctl(&ty, &translated);
    assert_eq!(pctl.final_location, translated.accept);
    assert_eq!(pctl.property(), "(Pmin=? [F location=2 & (a=0)]=(1/2))");
}

#[test]
fn whole_program_module_text() {
    let program = parse("let a = rand(0,1) in a").expect("parses");
    let result = translate_to_mdp(&program).expect("translates");
    assert_eq!(
        result.mdp.to_string(),
        "mdp\n\
         \n\
         module default\n\
         \n\
         location : [0..2] init 0;\n\
         v0 : [0..1] init 0;\n\
         a : [0..1] init 0;\n\
         \n\
         [] (location=0) -> 1/2 : (location'=1)&(v0'=0)+1/2 : (location'=1)&(v0'=1);\n\
         [] (location=1) -> 1 : (location'=2)&(a'=v0);\n\
         \n\
         endmodule"
    );
}

#[test]
fn translation_output_is_identical_across_runs() {
    let program = parse("let a = rand(0,3) in if a <= 1 then a else rand(0,1)").expect("parses");
    let first = translate_to_mdp(&program).expect("translates");
    let second = translate_to_mdp(&program).expect("translates");
    assert_eq!(first.mdp.to_string(), second.mdp.to_string());
    assert_eq!(first.init, second.init);
    assert_eq!(first.accept, second.accept);
    assert_eq!(first.value, second.value);
}

#[test]
fn parse_failure_reports_position_and_line() {
    let source = "let a = rand(0,1) in\na : {x:int | Prob(x=0) § 1/2}";
    let err = parse(source).expect_err("bad character");
    let rendered = err.display_with_source(source);
    assert!(rendered.contains("unknown token"), "{}", rendered);
    assert!(rendered.contains("Prob(x=0)"), "{}", rendered);
    assert!(rendered.contains('^'), "{}", rendered);
}

#[test]
fn demo_programs_parse_and_translate() {
    for path in ["demos/coin.prob", "demos/dice.prob"] {
        let source = std::fs::read_to_string(path).expect("demo file");
        let expr = parse(&source).unwrap_or_else(|err| panic!("{}: {}", path, err));
        probity::simple_typing(&expr).unwrap_or_else(|err| panic!("{}: {}", path, err));
    }
}
