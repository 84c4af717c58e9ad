//! Issuing calls and managing saved calls.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use rpcdesk_call::{
    referenced_variables, substitute, CallExecutor, CallRequest, GrpcurlExecutor, FormField,
    RequestBody,
};
use std::collections::BTreeMap;
use rpcdesk_protoset::resolve_request_fields;
use rpcdesk_storage::{CallRepository, DeskConfig, EnvironmentStore, JsonCallStore, SavedCall};
use std::path::Path;

/// Call parameters; anything left out comes from `--saved` (for `call`),
/// the record being edited (for `saved update`), or the config.
#[derive(Args, Debug, Default, Clone)]
pub struct CallArgs {
    /// Protoset (FileDescriptorSet) describing the service.
    #[arg(long)]
    pub protoset: Option<String>,
    /// Server address (`host:port`).
    #[arg(long)]
    pub server: Option<String>,
    /// Fully-qualified method (`pkg.Service.Method`).
    #[arg(long)]
    pub method: Option<String>,
    /// Use plaintext (no TLS).
    #[arg(long, overrides_with = "no_plaintext")]
    pub plaintext: bool,
    /// Use TLS even if the saved call or config says plaintext.
    #[arg(long)]
    pub no_plaintext: bool,
    /// Session cookie, sent as `Cookie:s=<value>` (takes precedence over the token).
    #[arg(long)]
    pub cookie: Option<String>,
    /// Bearer token for the `authorization` header.
    #[arg(long)]
    pub bearer_token: Option<String>,
    /// Local port forward, kept with saved calls for reference.
    #[arg(long)]
    pub port_forward: Option<String>,
    /// Request field value, repeatable.
    #[arg(long = "field", short = 'f', value_name = "NAME=VALUE")]
    pub fields: Vec<String>,
}

impl CallArgs {
    fn plaintext_override(&self) -> Option<bool> {
        if self.plaintext {
            Some(true)
        } else if self.no_plaintext {
            Some(false)
        } else {
            None
        }
    }

    /// Overlay the given flags onto `base`.
    fn apply_to(&self, mut base: SavedCall) -> SavedCall {
        let overlay = |target: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                *target = v.trim().to_string();
            }
        };
        overlay(&mut base.protoset, &self.protoset);
        overlay(&mut base.server, &self.server);
        overlay(&mut base.method, &self.method);
        overlay(&mut base.cookie, &self.cookie);
        overlay(&mut base.bearer_token, &self.bearer_token);
        overlay(&mut base.port_forward, &self.port_forward);
        if let Some(plaintext) = self.plaintext_override() {
            base.plaintext = plaintext;
        }
        base
    }
}

#[derive(Subcommand)]
pub enum SavedCommands {
    /// List saved calls.
    List,
    /// Print one saved call as JSON.
    Show { index: usize },
    /// Save a call definition.
    Add {
        #[command(flatten)]
        call: CallArgs,
        /// Free-form label shown in listings.
        #[arg(long)]
        label: Option<String>,
    },
    /// Edit a saved call in place; only the given flags change.
    Update {
        index: usize,
        #[command(flatten)]
        call: CallArgs,
        #[arg(long)]
        label: Option<String>,
    },
}

pub fn cmd_call(
    config: &DeskConfig,
    args: &CallArgs,
    saved: Option<usize>,
    env: Option<&str>,
) -> Result<()> {
    let base = match saved {
        Some(index) => {
            let store = JsonCallStore::open(&config.saved_calls_path);
            store
                .get(index)
                .cloned()
                .ok_or_else(|| anyhow!("no saved call at index {index} (have {})", store.len()))?
        }
        None => SavedCall {
            plaintext: config.plaintext,
            ..Default::default()
        },
    };
    let call = args.apply_to(base);

    let vars = match env.or(config.default_environment.as_deref()) {
        Some(name) => {
            let envs = EnvironmentStore::open(&config.environments_path);
            if !envs.contains(name) {
                bail!("unknown environment `{name}`");
            }
            envs.environment(name)
        }
        None => Default::default(),
    };

    let body = assemble_body(&call, &args.fields)?.with_variables(&vars);
    for field in body.invalid_choices() {
        eprintln!(
            "{} `{}` is not one of {}",
            "warning:".yellow().bold(),
            field.value,
            field.options.join(" | ")
        );
    }

    let request = CallRequest {
        plaintext: call.plaintext,
        cookie: call.cookie,
        bearer_token: call.bearer_token,
        protoset: call.protoset,
        server: call.server,
        method: call.method,
        body: body.to_json_string(),
    }
    .with_variables(&vars);
    request.validate()?;

    let unresolved: Vec<String> = [
        &request.cookie,
        &request.bearer_token,
        &request.protoset,
        &request.server,
        &request.method,
        &request.body,
    ]
    .into_iter()
    .flat_map(|text| referenced_variables(text))
    .collect();
    if !unresolved.is_empty() {
        tracing::warn!(variables = ?unresolved, "unresolved variables are sent as written");
    }

    let outcome = GrpcurlExecutor::new(&config.grpcurl_bin).execute(&request);
    print!("{}", outcome.report());
    if !outcome.succeeded() {
        bail!("call failed");
    }
    Ok(())
}

pub fn cmd_saved(config: &DeskConfig, command: SavedCommands) -> Result<()> {
    let mut store = JsonCallStore::open(&config.saved_calls_path);
    match command {
        SavedCommands::List => {
            if store.is_empty() {
                println!("{}", "(no saved calls)".dimmed());
            }
            for (i, call) in store.calls().iter().enumerate() {
                println!("{:>3}  {}", i.to_string().cyan(), call.display_text());
            }
        }
        SavedCommands::Show { index } => {
            let call = store
                .get(index)
                .ok_or_else(|| anyhow!("no saved call at index {index} (have {})", store.len()))?;
            println!("{}", serde_json::to_string_pretty(call)?);
        }
        SavedCommands::Add { call, label } => {
            let mut record = call.apply_to(SavedCall {
                plaintext: config.plaintext,
                ..Default::default()
            });
            record.body = assemble_body(&record, &call.fields)?.to_json_string();
            record.label = label.filter(|l| !l.trim().is_empty());
            let index = store.append(record).with_context(|| {
                format!("failed to save call to {}", store.path().display())
            })?;
            println!("  {} saved call {}", "→".cyan(), index);
        }
        SavedCommands::Update { index, call, label } => {
            let existing = store.get(index).cloned().unwrap_or_default();
            let mut record = call.apply_to(existing);
            record.body = assemble_body(&record, &call.fields)?.to_json_string();
            if let Some(label) = label {
                record.label = Some(label).filter(|l| !l.trim().is_empty());
            }
            store
                .update(index, record)
                .with_context(|| format!("failed to update saved call {index}"))?;
            println!("Saved call at index {index} updated successfully.");
        }
    }
    Ok(())
}

/// Request payload of a call being sent or saved.
#[derive(Debug)]
enum CallBody {
    /// Form over the resolved request fields.
    Form(RequestBody),
    /// The call's stored payload, kept verbatim because no form could be
    /// resolved and no `--field` was given.
    Stored(String),
}

impl CallBody {
    fn with_variables(self, vars: &BTreeMap<String, String>) -> Self {
        match self {
            CallBody::Form(form) => CallBody::Form(form.with_variables(vars)),
            CallBody::Stored(body) => CallBody::Stored(substitute(&body, vars)),
        }
    }

    fn invalid_choices(&self) -> Vec<&FormField> {
        match self {
            CallBody::Form(form) => form.invalid_choices(),
            CallBody::Stored(_) => Vec::new(),
        }
    }

    fn to_json_string(&self) -> String {
        match self {
            CallBody::Form(form) => form.to_json_string(),
            CallBody::Stored(body) => body.clone(),
        }
    }
}

/// Build the request form for `call.method`, pre-filled from the call's
/// saved body and then from `--field` flags.
///
/// Without `--field` values, a protoset that cannot be read or a method that
/// resolves to no fields leaves the saved body untouched.
fn assemble_body(call: &SavedCall, field_args: &[String]) -> Result<CallBody> {
    let fields = if call.protoset.is_empty() || call.method.is_empty() {
        Vec::new()
    } else {
        match rpcdesk_protoset::load(Path::new(&call.protoset)) {
            Ok(set) => resolve_request_fields(&set, &call.method),
            Err(err) if field_args.is_empty() => {
                tracing::warn!(error = %err, "protoset unavailable, keeping the saved body");
                return Ok(CallBody::Stored(call.body.clone()));
            }
            Err(err) => return Err(err).context("cannot apply --field values"),
        }
    };
    if fields.is_empty() && field_args.is_empty() {
        return Ok(CallBody::Stored(call.body.clone()));
    }

    let mut body = RequestBody::from_fields(&fields);
    body.prefill(&call.body);
    for arg in field_args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("--field expects NAME=VALUE, got `{arg}`"))?;
        body.set(name.trim(), value)
            .with_context(|| format!("method `{}`", call.method))?;
    }
    Ok(CallBody::Form(body))
}
