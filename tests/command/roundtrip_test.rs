//! The command string and the argument vector describe the same invocation.

use swc_command::command::{
    build_command_args, build_command_with, CommandOptions, Destination, Quoting, SourceMaps,
};

use super::{full_options, tree};

/// Split a command string like a POSIX shell would for our two quoting modes:
/// double quotes group, backslash escapes the next character.
fn shell_words(command: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut in_quotes = false;
    let mut escaped = false;

    for ch in command.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' if !in_quotes => {
                escaped = true;
                in_word = true;
            }
            '"' => {
                in_quotes = !in_quotes;
                in_word = true;
            }
            ' ' if !in_quotes => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            _ => {
                current.push(ch);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// Normalize shell words into flag/value pairs. A bare `--flag` means `true`.
fn string_pairs(words: &[String]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut iter = words.iter();
    while let Some(word) = iter.next() {
        if word == "-C" {
            let value = iter.next().cloned().unwrap_or_default();
            pairs.push((word.clone(), value));
        } else {
            match word.split_once('=') {
                Some((flag, value)) => pairs.push((flag.to_string(), value.to_string())),
                None => pairs.push((word.clone(), "true".to_string())),
            }
        }
    }
    pairs
}

fn token_pairs(tokens: &[String]) -> Vec<(String, String)> {
    tokens
        .chunks(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

fn assert_round_trip(options: &CommandOptions) {
    let tokens = build_command_args(options, &[]).unwrap();
    for quoting in [Quoting::DoubleQuote, Quoting::EscapeSpaces] {
        let words = shell_words(&build_command_with(options, &[], quoting).unwrap());

        assert_eq!(words[..3], tokens[..3], "prefix differs in {quoting:?}");
        assert_eq!(
            string_pairs(&words[3..]),
            token_pairs(&tokens[3..]),
            "options differ in {quoting:?}"
        );
    }
}

#[test]
fn shell_words_handles_both_modes() {
    assert_eq!(
        shell_words(r#"npx swc "some src" -C "a.b=c d""#),
        vec!["npx", "swc", "some src", "-C", "a.b=c d"]
    );
    assert_eq!(
        shell_words(r"npx swc some\ src --x=a\ b"),
        vec!["npx", "swc", "some src", "--x=a b"]
    );
}

#[test]
fn round_trip_full_fixture() {
    assert_round_trip(&full_options());
}

#[test]
fn round_trip_with_spaces() {
    let destination = Destination::OutFile("out dir/bundle.js".into());
    let options = CommandOptions::new("some src dir", destination)
        .source_root("my root")
        .only(&["src/a b/**", "lib/**"])
        .source_maps(SourceMaps::Both)
        .quiet(false)
        .config(tree(serde_json::json!({
            "jsc": { "experimental": { "cacheRoot": "cache dir" } },
            "exclude": ["a b", "c"]
        })));
    assert_round_trip(&options);
}

#[test]
fn round_trip_config_order_and_schema() {
    let options = CommandOptions::new("src", Destination::OutDir("dist".into())).config(tree(
        serde_json::json!({
            "$schema": "https://swc.rs/schema.json",
            "minify": false,
            "jsc": { "$schema": "x", "target": "es2020", "loose": true },
            "env": { "targets": ["chrome 80", "node 18"] }
        }),
    ));
    let tokens = build_command_args(&options, &[]).unwrap();
    assert_eq!(
        tokens[5..],
        [
            "-C",
            "minify=false",
            "-C",
            "jsc.target=es2020",
            "-C",
            "jsc.loose=true",
            "-C",
            "env.targets=chrome 80,node 18",
        ]
    );
    assert!(!tokens.iter().any(|t| t.contains("$schema")));
    assert_round_trip(&options);
}

#[test]
fn round_trip_empty_values() {
    let options = CommandOptions::new("", Destination::OutDir("dist".into()))
        .only(&[])
        .source_root("");
    let tokens = build_command_args(&options, &[]).unwrap();
    assert_eq!(tokens[2], "");

    assert_eq!(
        build_command_with(&options, &[], Quoting::EscapeSpaces).unwrap(),
        r#"npx swc "" --out-dir=dist --only="" --source-root="""#
    );
    assert_round_trip(&options);
}
