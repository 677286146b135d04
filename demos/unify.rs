// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use operation_unifier::{
    BuilderOptions, DefaultOperationBuilder, OperationSet, Resolver, TypeHierarchy, TypeRef,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SchemaFile {
    #[serde(default)]
    hierarchy: Option<TypeHierarchy>,
    #[serde(default)]
    options: BuilderOptions,
    #[serde(default)]
    queries: Vec<Resolver>,
    #[serde(default)]
    mutations: Vec<Resolver>,
}

fn read_hierarchy(file: &str) -> Result<TypeHierarchy> {
    let contents =
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {file}"))?;
    Ok(if file.ends_with(".json") {
        TypeHierarchy::from_json_str(&contents)?
    } else if file.ends_with(".yaml") {
        serde_yaml::from_str(&contents)?
    } else {
        bail!("Unsupported hierarchy file `{file}`. Must be json or yaml.")
    })
}

fn unify_build(file: String, compact: bool) -> Result<()> {
    let contents =
        std::fs::read_to_string(&file).with_context(|| format!("Failed to read {file}"))?;
    let schema: SchemaFile = if file.ends_with(".json") {
        serde_json::from_str(&contents)?
    } else if file.ends_with(".yaml") {
        serde_yaml::from_str(&contents)?
    } else {
        bail!("Unsupported schema file `{file}`. Must be json or yaml.")
    };

    let builder = DefaultOperationBuilder::new(schema.hierarchy.unwrap_or_default())
        .with_options(schema.options);
    let operations = OperationSet::build(&builder, schema.queries, schema.mutations)
        .with_context(|| format!("Failed to build operations from {file}"))?;

    if compact {
        println!("{}", serde_json::to_string(&operations)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&operations)?);
    }
    Ok(())
}

fn unify_join(types: &[String], hierarchy: Option<String>) -> Result<()> {
    let hierarchy = match hierarchy {
        Some(file) => read_hierarchy(&file)?,
        None => TypeHierarchy::builtin(),
    };
    let types = types
        .iter()
        .map(|text| text.parse::<TypeRef>())
        .collect::<Result<Vec<_>, _>>()?;
    let joined = hierarchy.join(&types)?;
    if hierarchy.is_content_free(&joined) {
        println!("{joined} (content-free)");
    } else {
        println!("{joined}");
    }
    Ok(())
}

#[derive(Subcommand)]
enum UnifyCommand {
    /// Build every query and mutation of a schema file.
    Build {
        /// Schema file holding a hierarchy, options and resolvers. json or yaml.
        file: String,

        /// Print compact json.
        #[arg(long, short)]
        compact: bool,
    },

    /// Print the join of some types.
    Join {
        /// Types in textual syntax, e.g. `List<Int>`.
        #[arg(required(true))]
        types: Vec<String>,

        /// Hierarchy file. json or yaml. Defaults to the built-in hierarchy.
        #[arg(long, value_name = "hierarchy.json|hierarchy.yaml")]
        hierarchy: Option<String>,
    },
}

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: UnifyCommand,
}

fn main() -> Result<()> {
    env_logger::init();

    // Parse and dispatch command.
    let cli = Cli::parse();
    match cli.command {
        UnifyCommand::Build { file, compact } => unify_build(file, compact),
        UnifyCommand::Join { types, hierarchy } => unify_join(&types, hierarchy),
    }
}
