//! Fixture tests for option rendering and command assembly.

use serde_json::json;
use swc_command::command::{
    build_command, build_command_args, build_command_with, build_config_option,
    build_config_option_with, build_option, build_option_with, option_prop_to_command_arg,
    CommandError, ConfigTree, OptionValue, Quoting,
};

use super::{full_options, tree};

const FULL_DOUBLE_QUOTE: &str = r#"npx swc "src" --out-dir="dist" --ignore="**/*.spec.ts,**/*.test.ts" --watch --sync=false --source-maps=false --log-watch-compilation --source-map-target="dist/input.map.js" -C "jsc.minify.compress=true" -C "jsc.minify.mangle=true" -C "jsc.parser.syntax=typescript" -C "jsc.parser.decorators=true" -C "jsc.parser.dynamicImport=true" -C "jsc.parser.tsx=true" -C "jsc.loose=true" -C "exclude=**/*.spec.ts,**/*.test.ts" -C "sourceMaps=true" -C "minify=true" -C "module.type=commonjs""#;

const FULL_NO_QUOTE: &str = "npx swc src --out-dir=dist --ignore=**/*.spec.ts,**/*.test.ts --watch --sync=false --source-maps=false --log-watch-compilation --source-map-target=dist/input.map.js -C jsc.minify.compress=true -C jsc.minify.mangle=true -C jsc.parser.syntax=typescript -C jsc.parser.decorators=true -C jsc.parser.dynamicImport=true -C jsc.parser.tsx=true -C jsc.loose=true -C exclude=**/*.spec.ts,**/*.test.ts -C sourceMaps=true -C minify=true -C module.type=commonjs";

fn option_config() -> ConfigTree {
    tree(json!({
        "jsc": {
            "minify": { "compress": true, "mangle": true },
            "parser": {
                "syntax": "typescript",
                "decorators": true,
                "dynamicImport": true,
                "tsx": true
            },
            "loose": true
        },
        "exclude": ["**/*.spec.ts", "**/*.test.ts"],
        "sourceMaps": true,
        "minify": true,
        "module": { "type": "commonjs" }
    }))
}

/// (name, value, double-quote form, escaped form)
fn option_cases() -> Vec<(&'static str, Option<OptionValue>, String, String)> {
    let list = OptionValue::from(&["**/*.spec.ts", "**/*.test.ts"][..]);
    vec![
        (
            "ignore",
            Some(list),
            r#"--ignore="**/*.spec.ts,**/*.test.ts""#.into(),
            "--ignore=**/*.spec.ts,**/*.test.ts".into(),
        ),
        ("watch", Some(true.into()), "--watch".into(), "--watch".into()),
        ("sync", Some(false.into()), "--sync=false".into(), "--sync=false".into()),
        (
            "sourceMaps",
            Some(false.into()),
            "--source-maps=false".into(),
            "--source-maps=false".into(),
        ),
        (
            "sourceMaps",
            Some("inline".into()),
            r#"--source-maps="inline""#.into(),
            "--source-maps=inline".into(),
        ),
        (
            "logWatchCompilation",
            Some(true.into()),
            "--log-watch-compilation".into(),
            "--log-watch-compilation".into(),
        ),
        (
            "logWatchCompilation",
            Some(false.into()),
            "--log-watch-compilation=false".into(),
            "--log-watch-compilation=false".into(),
        ),
        (
            "sourceMapTarget",
            Some("dist/input.map.js".into()),
            r#"--source-map-target="dist/input.map.js""#.into(),
            "--source-map-target=dist/input.map.js".into(),
        ),
        (
            "config",
            Some(option_config().into()),
            r#"-C "jsc.minify.compress=true" -C "jsc.minify.mangle=true" -C "jsc.parser.syntax=typescript" -C "jsc.parser.decorators=true" -C "jsc.parser.dynamicImport=true" -C "jsc.parser.tsx=true" -C "jsc.loose=true" -C "exclude=**/*.spec.ts,**/*.test.ts" -C "sourceMaps=true" -C "minify=true" -C "module.type=commonjs""#.into(),
            "-C jsc.minify.compress=true -C jsc.minify.mangle=true -C jsc.parser.syntax=typescript -C jsc.parser.decorators=true -C jsc.parser.dynamicImport=true -C jsc.parser.tsx=true -C jsc.loose=true -C exclude=**/*.spec.ts,**/*.test.ts -C sourceMaps=true -C minify=true -C module.type=commonjs".into(),
        ),
        (
            "src",
            Some("src/index.ts".into()),
            r#""src/index.ts""#.into(),
            "src/index.ts".into(),
        ),
        (
            "src",
            Some("some src dir".into()),
            r#""some src dir""#.into(),
            r"some\ src\ dir".into(),
        ),
        ("configFile", None, String::new(), String::new()),
    ]
}

#[test]
fn option_prop_to_command_arg_cases() {
    let cases = [
        ("only", "--only"),
        ("ignore", "--ignore"),
        ("configFile", "--config-file"),
        ("sourceMapTarget", "--source-map-target"),
    ];
    for (prop, expected) in cases {
        assert_eq!(option_prop_to_command_arg(prop), expected);
    }
}

#[test]
fn build_config_option_with_schema_and_arrays() {
    let config = tree(json!({
        "$schema": "......",
        "env": {
            "loose": true,
            "dynamicImport": true,
            "exclude": ["**/*.spec.ts"]
        },
        "module": { "type": "commonjs" },
        "jsc": {
            "parser": {
                "syntax": "typescript",
                "tsx": false,
                "decorators": true,
                "dynamicImport": true
            },
            "minify": { "compress": true, "mangle": true }
        },
        "sourceMaps": true
    }));

    let double_quote = build_config_option_with(&config, Quoting::DoubleQuote);
    assert_eq!(double_quote, build_config_option(&config));
    assert_eq!(
        double_quote,
        r#"-C "env.loose=true" -C "env.dynamicImport=true" -C "env.exclude=**/*.spec.ts" -C "module.type=commonjs" -C "jsc.parser.syntax=typescript" -C "jsc.parser.tsx=false" -C "jsc.parser.decorators=true" -C "jsc.parser.dynamicImport=true" -C "jsc.minify.compress=true" -C "jsc.minify.mangle=true" -C "sourceMaps=true""#
    );
    assert_eq!(
        build_config_option_with(&config, Quoting::EscapeSpaces),
        "-C env.loose=true -C env.dynamicImport=true -C env.exclude=**/*.spec.ts -C module.type=commonjs -C jsc.parser.syntax=typescript -C jsc.parser.tsx=false -C jsc.parser.decorators=true -C jsc.parser.dynamicImport=true -C jsc.minify.compress=true -C jsc.minify.mangle=true -C sourceMaps=true"
    );
}

#[test]
fn build_config_option_all_false_parser() {
    let config = tree(json!({
        "jsc": {
            "parser": {
                "syntax": "ecmascript",
                "jsx": false,
                "dynamicImport": false,
                "privateMethod": false,
                "functionBind": false,
                "exportDefaultFrom": false,
                "exportNamespaceFrom": false,
                "decorators": false,
                "decoratorsBeforeExport": false,
                "topLevelAwait": false,
                "importMeta": false
            },
            "target": "es5",
            "loose": false,
            "externalHelpers": false,
            "keepClassNames": false
        },
        "minify": false
    }));

    assert_eq!(
        build_config_option(&config),
        r#"-C "jsc.parser.syntax=ecmascript" -C "jsc.parser.jsx=false" -C "jsc.parser.dynamicImport=false" -C "jsc.parser.privateMethod=false" -C "jsc.parser.functionBind=false" -C "jsc.parser.exportDefaultFrom=false" -C "jsc.parser.exportNamespaceFrom=false" -C "jsc.parser.decorators=false" -C "jsc.parser.decoratorsBeforeExport=false" -C "jsc.parser.topLevelAwait=false" -C "jsc.parser.importMeta=false" -C "jsc.target=es5" -C "jsc.loose=false" -C "jsc.externalHelpers=false" -C "jsc.keepClassNames=false" -C "minify=false""#
    );
    assert_eq!(
        build_config_option_with(&config, Quoting::EscapeSpaces),
        "-C jsc.parser.syntax=ecmascript -C jsc.parser.jsx=false -C jsc.parser.dynamicImport=false -C jsc.parser.privateMethod=false -C jsc.parser.functionBind=false -C jsc.parser.exportDefaultFrom=false -C jsc.parser.exportNamespaceFrom=false -C jsc.parser.decorators=false -C jsc.parser.decoratorsBeforeExport=false -C jsc.parser.topLevelAwait=false -C jsc.parser.importMeta=false -C jsc.target=es5 -C jsc.loose=false -C jsc.externalHelpers=false -C jsc.keepClassNames=false -C minify=false"
    );
}

#[test]
fn build_option_default_is_double_quote() {
    for (name, value, _, _) in option_cases() {
        assert_eq!(
            build_option(name, value.as_ref()).unwrap(),
            build_option_with(name, value.as_ref(), Quoting::DoubleQuote).unwrap(),
            "default quoting differs for {name}"
        );
    }
}

#[test]
fn build_option_double_quote() {
    for (name, value, expected, _) in option_cases() {
        assert_eq!(
            build_option_with(name, value.as_ref(), Quoting::DoubleQuote).unwrap(),
            expected
        );
    }
}

#[test]
fn build_option_escape_spaces() {
    for (name, value, _, expected) in option_cases() {
        assert_eq!(
            build_option_with(name, value.as_ref(), Quoting::EscapeSpaces).unwrap(),
            expected
        );
    }
}

#[test]
fn build_option_wrong_type_error() {
    let value = OptionValue::Config(ConfigTree::new());
    let err = build_option_with("bogus-name", Some(&value), Quoting::EscapeSpaces).unwrap_err();

    assert!(matches!(
        &err,
        CommandError::UnsupportedValueType { option } if option == "bogus-name"
    ));
    assert!(err.to_string().contains("Wrong options value type for bogus-name"));
    assert!(err.to_string().contains("https://swc.rs/docs/usage/cli"));
}

#[test]
fn build_command_full_fixture() {
    let options = full_options();

    let with_quotes = build_command_with(&options, &[], Quoting::DoubleQuote).unwrap();
    assert_eq!(with_quotes, build_command(&options, &[]).unwrap());
    assert_eq!(with_quotes, FULL_DOUBLE_QUOTE);

    assert_eq!(
        build_command_with(&options, &[], Quoting::EscapeSpaces).unwrap(),
        FULL_NO_QUOTE
    );
}

#[test]
fn build_command_ignore_list() {
    let extra = |name: &str| Some(OptionValue::Config(tree(json!({ "name": name }))));
    // extra props hold config trees under foreign names, which would fail unless ignored
    let mut options = full_options();
    options.insert("extraProp", extra("extra prop for test purpose"));
    options.insert("anotherExtraProp", extra("in the middle"));
    options.insert("spawnOptions", extra("this is why we added the ignore feature"));
    let ignore = ["extraProp", "anotherExtraProp", "spawnOptions"];

    assert_eq!(build_command(&options, &ignore).unwrap(), FULL_DOUBLE_QUOTE);
    assert_eq!(
        build_command_with(&options, &ignore, Quoting::EscapeSpaces).unwrap(),
        FULL_NO_QUOTE
    );
    assert!(build_command(&options, &[]).is_err());
}

#[test]
fn build_command_args_full_fixture() {
    let args = build_command_args(&full_options(), &[]).unwrap();
    let expected = [
        "npx",
        "swc",
        "src",
        "--out-dir",
        "dist",
        "--ignore",
        "**/*.spec.ts,**/*.test.ts",
        "--watch",
        "true",
        "--sync",
        "false",
        "--source-maps",
        "false",
        "--log-watch-compilation",
        "true",
        "--source-map-target",
        "dist/input.map.js",
        "-C",
        "jsc.minify.compress=true",
        "-C",
        "jsc.minify.mangle=true",
        "-C",
        "jsc.parser.syntax=typescript",
        "-C",
        "jsc.parser.decorators=true",
        "-C",
        "jsc.parser.dynamicImport=true",
        "-C",
        "jsc.parser.tsx=true",
        "-C",
        "jsc.loose=true",
        "-C",
        "exclude=**/*.spec.ts,**/*.test.ts",
        "-C",
        "sourceMaps=true",
        "-C",
        "minify=true",
        "-C",
        "module.type=commonjs",
    ];
    assert_eq!(args, expected);
}

#[test]
fn build_command_args_source_is_unquoted() {
    use swc_command::command::{CommandOptions, Destination};

    let options = CommandOptions::new("some src dir", Destination::OutFile("out file.js".into()));
    assert_eq!(
        build_command_args(&options, &[]).unwrap(),
        vec!["npx", "swc", "some src dir", "--out-file", "out file.js"]
    );
}

#[test]
fn undefined_options_change_nothing() {
    use swc_command::command::{CommandOptions, Destination};

    let plain = CommandOptions::new("src", Destination::OutDir("dist".into()))
        .watch(true)
        .source_root("my root");
    let with_undefined = CommandOptions::new("src", Destination::OutDir("dist".into()))
        .set("configFile", None)
        .watch(true)
        .set("filename", None)
        .source_root("my root");

    for quoting in [Quoting::DoubleQuote, Quoting::EscapeSpaces] {
        assert_eq!(
            build_command_with(&with_undefined, &[], quoting).unwrap(),
            build_command_with(&plain, &[], quoting).unwrap()
        );
    }
    assert_eq!(
        build_command_args(&with_undefined, &[]).unwrap(),
        build_command_args(&plain, &[]).unwrap()
    );
}

#[test]
fn document_key_order_places_destination() {
    use swc_command::command::CommandOptions;

    let options =
        CommandOptions::from_json_str(r#"{"src": "s", "watch": true, "outDir": "d"}"#, &[])
            .unwrap();

    assert_eq!(
        build_command(&options, &[]).unwrap(),
        r#"npx swc "s" --watch --out-dir="d""#
    );
    assert_eq!(
        build_command_args(&options, &[]).unwrap(),
        vec!["npx", "swc", "s", "--watch", "true", "--out-dir", "d"]
    );
}
