use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;

use clap::Parser;
use serde::Serialize;
use tg_config::checker::{ATTR_IF_NODE, ATTR_IF_UNDEF_ATTR, IGNORE_ATTR_PREFIX};
use tg_config::{
    evaluate_condition, get_attribute_value, parse_owner, parse_owner_exists, parse_tile,
    parse_tile_selector_and, parse_tile_selector_or, visit_named_element_children, OwnerRef,
    ParseContext,
};
use tg_core::{AppPreferences, ConfigError, Named, OwnerType};
use tg_parser::{parse_xml_document, XmlDocument, XmlElementNode};

mod cli_args;
mod error_map;
mod prefs;
mod source_loader;

pub(crate) use cli_args::{
    Cli, ConditionArgs, Mode, OwnerArgs, RequiredOwner, SelectArgs, SourceArgs, VisitArgs,
};
pub(crate) use error_map::{
    emit_error, map_cli_output, map_cli_prefs_invalid, map_cli_source_path, map_cli_source_read,
};
pub(crate) use source_loader::{load_document, load_preferences};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return error.exit_code(),
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, ConfigError> {
    match cli.command {
        Mode::Condition(args) => run_condition(args),
        Mode::Visit(args) => run_visit(args),
        Mode::Owner(args) => run_owner(args),
        Mode::Select(args) => run_select(args),
    }
}

fn load(source: &SourceArgs) -> Result<(XmlDocument, Option<AppPreferences>), ConfigError> {
    let document = load_document(&source.file)?;
    let preferences = source.prefs.as_deref().map(load_preferences).transpose()?;
    Ok((document, preferences))
}

fn new_context<'a>(
    source: &SourceArgs,
    preferences: Option<&'a AppPreferences>,
    named: &'a mut Named,
) -> ParseContext<'a> {
    let mut ctx = match preferences {
        Some(preferences) => ParseContext::with_preferences(preferences, named),
        None => ParseContext::new(named),
    };
    ctx.set_context_owner(source.team.unwrap_or(-1), source.mate.unwrap_or(-1));
    ctx
}

fn run_condition(args: ConditionArgs) -> Result<i32, ConfigError> {
    let (document, preferences) = load(&args.source)?;
    let mut named = Named::new();
    let mut ctx = new_context(&args.source, preferences.as_ref(), &mut named);
    let value = evaluate_condition(&mut ctx, &document.root)?;
    ctx.finish()?;

    println!("RESULT:OK");
    println!("VALUE:{}", value);
    Ok(0)
}

#[derive(Debug, Serialize)]
struct VisitedChild {
    element: String,
    line: usize,
    attributes: BTreeMap<String, String>,
}

/// Attribute names of the element and of its `AttrIf` blocks.
fn candidate_attributes(element: &XmlElementNode) -> BTreeSet<&str> {
    let own = element.attributes.keys();
    let overridden = element
        .children_named(ATTR_IF_NODE)
        .flat_map(|attr_if| attr_if.attributes.keys());
    own.chain(overridden)
        .map(String::as_str)
        .filter(|name| *name != ATTR_IF_UNDEF_ATTR && !name.starts_with(IGNORE_ATTR_PREFIX))
        .collect()
}

fn run_visit(args: VisitArgs) -> Result<i32, ConfigError> {
    let (document, preferences) = load(&args.source)?;
    let mut named = Named::new();
    let mut ctx = new_context(&args.source, preferences.as_ref(), &mut named);
    let name = args.name.as_deref().unwrap_or("");

    let mut children = Vec::new();
    visit_named_element_children(&mut ctx, &document.root, name, |ctx, child| {
        let mut attributes = BTreeMap::new();
        for attr in candidate_attributes(child) {
            if let Some(value) = get_attribute_value(ctx, child, attr)? {
                attributes.insert(attr.to_string(), value.to_string());
            }
        }
        children.push(VisitedChild {
            element: child.name.clone(),
            line: child.line(),
            attributes,
        });
        Ok(())
    })?;
    ctx.finish()?;

    println!("RESULT:OK");
    for child in &children {
        println!("CHILD_JSON:{}", serde_json::to_string(child).map_err(map_cli_output)?);
    }
    Ok(0)
}

impl From<RequiredOwner> for OwnerType {
    fn from(required: RequiredOwner) -> Self {
        match required {
            RequiredOwner::Game => OwnerType::Game,
            RequiredOwner::Team => OwnerType::Team,
            RequiredOwner::Player => OwnerType::Player,
        }
    }
}

fn describe_owner(owner: OwnerRef) -> String {
    match owner {
        OwnerRef::Game => "game".to_string(),
        OwnerRef::Team(team) => format!("team:{}", team),
        OwnerRef::Player { team, mate } => format!("player:{}:{}", team, mate),
    }
}

fn run_owner(args: OwnerArgs) -> Result<i32, ConfigError> {
    let (document, preferences) = load(&args.source)?;
    let Some(preferences) = preferences else {
        return Err(ConfigError::new(
            "CLI_PREFS_REQUIRED",
            "owner resolution needs a preferences snapshot (--prefs)",
        ));
    };
    let mut named = Named::new();
    let mut ctx = new_context(&args.source, Some(&preferences), &mut named);
    let root = &document.root;

    ctx.open(root);
    let exists = parse_owner_exists(&mut ctx, root)?;
    let owner = match args.require {
        Some(required) => Some(parse_owner(&mut ctx, root, required.into())?),
        None => None,
    };
    ctx.close(root, true, true)?;
    ctx.finish()?;

    println!("RESULT:OK");
    println!("EXISTS:{}", exists.exists);
    println!("TEAM:{}", exists.team);
    println!("MATE:{}", exists.mate);
    if let Some(owner) = owner {
        println!("OWNER:{}", describe_owner(owner));
    }
    Ok(0)
}

fn run_select(args: SelectArgs) -> Result<i32, ConfigError> {
    let (document, preferences) = load(&args.source)?;
    let mut named = Named::new();
    let mut ctx = new_context(&args.source, preferences.as_ref(), &mut named);

    let selector = if args.all {
        parse_tile_selector_and(&mut ctx, &document.root)?
    } else {
        parse_tile_selector_or(&mut ctx, &document.root)?
    };
    let mut matches = Vec::with_capacity(args.tiles.len());
    for source in &args.tiles {
        let tile_document = parse_xml_document(source)?;
        let tile = parse_tile(&mut ctx, &tile_document.root)?;
        matches.push(selector.matches(&tile, args.skin));
    }
    ctx.finish()?;

    println!("RESULT:OK");
    for matched in matches {
        println!("MATCH:{}", matched);
    }
    Ok(0)
}
