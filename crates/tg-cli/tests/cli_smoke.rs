use std::fs;
use std::process::{Command, Output};

const PREFERENCES: &str = r#"{
    "options": [
        {"name": "Difficulty", "owner": "GAME", "kind": "int", "min": 0, "max": 10, "default": 3},
        {"name": "Speed", "owner": "TEAM", "kind": "enum",
         "values": [{"value": 0, "name": "Slow"}, {"value": 1, "name": "Fast"}], "default": 0}
    ],
    "values": {"Difficulty": 7},
    "teams": [
        {"name": "Red", "values": {"Speed": 1},
         "mates": [{"name": "Ann"}, {"name": "Bot", "ai": true}]},
        {"name": "Blue", "mates": [{"name": "Cy", "ai": true}]}
    ]
}"#;

fn fixture(name: &str, content: &str) -> String {
    let path = std::env::temp_dir().join(format!("tg-cli-smoke-{}-{}", std::process::id(), name));
    fs::write(&path, content).expect("fixture must be writable");
    path.to_string_lossy().into_owned()
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tg-cli"))
        .args(args)
        .output()
        .expect("cli should execute")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn condition_reads_live_preferences() {
    let prefs = fixture("prefs.json", PREFERENCES);
    let condition = fixture(
        "condition.xml",
        r#"<If>
            <And>
                <Option name="Difficulty" from="5" to="10"/>
                <AIPlayers value="2"/>
            </And>
        </If>"#,
    );
    let output = run(&["condition", "--file", condition.as_str(), "--prefs", prefs.as_str()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_lines(&output), vec!["RESULT:OK", "VALUE:true"]);

    let team_option = fixture(
        "team-option.xml",
        r#"<If><Option name="Speed" value="Fast" ownerType="TEAM"/></If>"#,
    );
    let red = run(&["condition", "--file", team_option.as_str(), "--prefs", prefs.as_str(), "--team", "0"]);
    assert_eq!(stdout_lines(&red), vec!["RESULT:OK", "VALUE:true"]);
    let blue = run(&["condition", "--file", team_option.as_str(), "--prefs", prefs.as_str(), "--team", "1"]);
    assert_eq!(stdout_lines(&blue), vec!["RESULT:OK", "VALUE:false"]);
}

#[test]
fn visit_applies_conditional_blocks() {
    let prefs = fixture("visit-prefs.json", PREFERENCES);
    let document = fixture(
        "visit.xml",
        r#"<Layout>
            <Panel id="1">
                <AttrIf width="40"><Teams value="2"/></AttrIf>
            </Panel>
            <Panel id="2">
                <ExistIf><Teams value="3"/></ExistIf>
            </Panel>
            <Group>
                <PassthroughIf><True/></PassthroughIf>
                <Panel id="3" team="1"/>
                <Panel id="4" team="5"/>
            </Group>
        </Layout>"#,
    );
    let output = run(&["visit", "--file", document.as_str(), "--prefs", prefs.as_str()]);
    assert!(output.status.success(), "stdout: {}", String::from_utf8_lossy(&output.stdout));
    assert_eq!(
        stdout_lines(&output),
        vec![
            "RESULT:OK",
            r#"CHILD_JSON:{"element":"Panel","line":2,"attributes":{"id":"1","width":"40"}}"#,
            r#"CHILD_JSON:{"element":"Panel","line":10,"attributes":{"id":"3","team":"1"}}"#,
        ]
    );
}

#[test]
fn owner_resolves_player_index() {
    let prefs = fixture("owner-prefs.json", PREFERENCES);
    let document = fixture("owner.xml", r#"<Owner player="1"/>"#);
    let output = run(&[
        "owner",
        "--file",
        document.as_str(),
        "--prefs",
        prefs.as_str(),
        "--require",
        "player",
    ]);
    assert_eq!(
        stdout_lines(&output),
        vec!["RESULT:OK", "EXISTS:true", "TEAM:0", "MATE:1", "OWNER:player:0:1"]
    );
}

#[test]
fn select_matches_tiles() {
    let selector = fixture(
        "selector.xml",
        r##"<TileSelector>
            <And>
                <Char char="A"/>
                <Color color="#FF0000" not="true"/>
            </And>
        </TileSelector>"##,
    );
    let output = run(&[
        "select",
        "--file",
        selector.as_str(),
        "--tile",
        r##"<Tile char="A" color="#0000FF"/>"##,
        "--tile",
        r##"<Tile char="A" color="#FF0000"/>"##,
    ]);
    assert_eq!(stdout_lines(&output), vec!["RESULT:OK", "MATCH:true", "MATCH:false"]);
}

#[test]
fn select_tile_item_with_nested_negated_color() {
    let selector = fixture(
        "tile-selector.xml",
        r##"<TileSelector>
            <Tile char="A"><Color color="#FF0000" not="true"/></Tile>
        </TileSelector>"##,
    );
    let output = run(&[
        "select",
        "--file",
        selector.as_str(),
        "--tile",
        r##"<Tile char="A" color="#00FF00"/>"##,
        "--tile",
        r##"<Tile char="A" color="#FF0000"/>"##,
        "--tile",
        r##"<Tile char="B" color="#00FF00"/>"##,
    ]);
    assert_eq!(
        stdout_lines(&output),
        vec!["RESULT:OK", "MATCH:true", "MATCH:false", "MATCH:false"]
    );
}

#[test]
fn errors_use_the_result_protocol() {
    let selector = fixture("bad-selector.xml", r#"<TileSelector><Not/></TileSelector>"#);
    let output = run(&["select", "--file", selector.as_str()]);
    assert_eq!(output.status.code(), Some(1));
    let lines = stdout_lines(&output);
    assert_eq!(lines[0], "RESULT:ERROR");
    assert_eq!(lines[1], "ERROR_CODE:SELECTOR_OPERANDS");
    assert!(lines[2].starts_with("ERROR_MSG_JSON:"));
    assert!(lines[2].contains("needs exactly one operand"));
}
