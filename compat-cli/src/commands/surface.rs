//! Surface command - list the observable API of one module
//!
//! Shows what the check command compares: every type with its kind and
//! effective visibility, and the members code outside the module can see.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use compat_core::surface::{MemberSurface, Snapshot, TypeSurface};

use crate::loader::load_module;
use crate::output::{colorize, OutputConfig, Outputter, TableOutput};

#[derive(Debug, Args)]
pub struct SurfaceArgs {
    /// Module: "[file|]<path>"
    pub module: String,

    /// Include types that are not observable outside the module
    #[arg(long)]
    pub all: bool,
}

/// One member as listed by the surface command.
#[derive(Debug, Serialize)]
pub struct MemberEntry {
    pub kind: &'static str,
    pub signature: String,
    pub visibility: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    pub is_static: bool,
}

impl MemberEntry {
    fn from_surface(member: &MemberSurface) -> Self {
        Self {
            kind: member.kind().as_str(),
            signature: member.key.to_string(),
            visibility: member.visibility.as_str(),
            value_type: member.detail.value_type().map(str::to_string),
            is_static: member.is_static,
        }
    }
}

/// One type as listed by the surface command.
#[derive(Debug, Serialize)]
pub struct TypeEntry {
    pub name: String,
    pub kind: &'static str,
    pub visibility: &'static str,
    pub observable: bool,
    pub members: Vec<MemberEntry>,
}

impl TypeEntry {
    fn from_surface(ty: &TypeSurface) -> Self {
        Self {
            name: ty.name.clone(),
            kind: ty.kind.as_str(),
            visibility: ty.effective_visibility.as_str(),
            observable: ty.is_observable(),
            members: ty.observable_members().map(MemberEntry::from_surface).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SurfaceReport {
    pub module: String,
    pub types: Vec<TypeEntry>,
}

impl SurfaceReport {
    pub fn from_snapshot(module: &str, snapshot: &Snapshot, include_hidden: bool) -> Self {
        Self {
            module: module.to_string(),
            types: snapshot
                .iter()
                .filter(|ty| include_hidden || ty.is_observable())
                .map(TypeEntry::from_surface)
                .collect(),
        }
    }

    fn member_count(&self) -> usize {
        self.types.iter().map(|t| t.members.len()).sum()
    }
}

impl Outputter for SurfaceReport {
    fn to_text(&self, config: &OutputConfig) -> String {
        let mut output = String::new();

        for ty in &self.types {
            let name = colorize(&ty.name, config, |s| s.bold());
            output.push_str(&format!("{} {} {}\n", ty.visibility, ty.kind, name));
            for member in &ty.members {
                let prefix = if member.is_static { "static " } else { "" };
                match &member.value_type {
                    Some(value_type) => output.push_str(&format!(
                        "  {} {}{} {}: {}\n",
                        member.visibility, prefix, member.kind, member.signature, value_type
                    )),
                    None => output.push_str(&format!(
                        "  {} {}{} {}\n",
                        member.visibility, prefix, member.kind, member.signature
                    )),
                }
            }
        }

        output.push_str(&format!(
            "{} types, {} members",
            self.types.len(),
            self.member_count()
        ));
        output
    }

    fn to_table(&self, config: &OutputConfig) -> String {
        let rows: Vec<Vec<String>> = self
            .types
            .iter()
            .map(|ty| {
                vec![
                    ty.name.clone(),
                    ty.kind.to_string(),
                    ty.visibility.to_string(),
                    ty.members.len().to_string(),
                ]
            })
            .collect();

        TableOutput::format_rows(&["Type", "Kind", "Visibility", "Members"], &rows, config)
    }
}

/// Run the surface command
pub fn run(args: SurfaceArgs, output: &OutputConfig) -> anyhow::Result<()> {
    let module = load_module(&args.module)?;
    let snapshot = Snapshot::extract(&module.types)?;

    SurfaceReport::from_snapshot(&module.name, &snapshot, args.all).output(output);
    Ok(())
}
