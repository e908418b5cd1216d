use serde::Deserialize;

use chess_uci::uci::request::OptionRequest;
use chess_uci::uci::{parse_command, Request};

#[derive(Deserialize)]
struct CaseSet {
    cases: Vec<Case>,
}

#[derive(Deserialize)]
struct Case {
    line: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    context: String,
    error: Option<String>,
}

fn parse(line: &str) -> Result<Request, String> {
    let command = parse_command(line)
        .map_err(|e| e.to_string())?
        .expect("non-blank line");
    Request::try_from(command).map_err(|e| e.to_string())
}

#[test]
fn setoption_suite() {
    let data = include_str!("data/setoption.json");
    let set: CaseSet = serde_json::from_str(data).expect("invalid setoption.json");
    assert!(!set.cases.is_empty());

    for case in &set.cases {
        let got = parse(&case.line);
        match &case.error {
            Some(error) => assert_eq!(got.as_ref(), Err(error), "{}", case.line),
            None => assert_eq!(
                got,
                Ok(Request::SetOption(OptionRequest {
                    name: case.name.clone(),
                    value: case.value.clone(),
                    context: case.context.clone(),
                })),
                "{}",
                case.line
            ),
        }
    }
}
