//! State-changing commands: server reset and floating IP creation.

use crate::api::{ActionWaiter, FloatingIpActions, ResourceDirectory, ServerActions};
use crate::error::{Error, Result};
use crate::models::{FloatingIp, FloatingIpCreateOpts, FloatingIpType, Server};
use crate::output::{describe_raw, OutputMode};
use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;

pub fn reset_server<A, W>(
    api: &A,
    waiter: &dyn ActionWaiter,
    id_or_name: &str,
    out: &mut W,
) -> Result<()>
where
    A: ResourceDirectory<Server> + ServerActions + ?Sized,
    W: Write,
{
    let server = api
        .resolve(id_or_name)?
        .ok_or_else(|| Error::not_found("Server", id_or_name))?;
    let action = api.reset(&server)?;
    waiter.wait(&action)?;
    writeln!(out, "Server {} reset", server.id)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectionLevel {
    Delete,
}

impl FromStr for ProtectionLevel {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(ProtectionLevel::Delete),
            _ => Err(Error::InvalidArgument(format!(
                "unknown protection level: {s}"
            ))),
        }
    }
}

/// Parses repeated `key=value` label arguments.
pub fn parse_labels(raw: &[String]) -> Result<BTreeMap<String, String>> {
    raw.iter()
        .map(|item| match item.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(Error::InvalidArgument(format!(
                "invalid label {item:?}, expected key=value"
            ))),
        })
        .collect()
}

pub fn parse_protection(raw: &[String]) -> Result<Vec<ProtectionLevel>> {
    raw.iter()
        .flat_map(|item| item.split(','))
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect()
}

#[derive(Debug, Clone)]
pub struct FloatingIpCreateRequest {
    pub ip_type: FloatingIpType,
    pub name: Option<String>,
    pub home_location: Option<String>,
    /// Server ID or name to assign the new IP to.
    pub server: Option<String>,
    pub description: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub protection: Vec<ProtectionLevel>,
    pub mode: OutputMode,
}

/// Creates a floating IP and optionally enables protection on it.
///
/// Status lines go to `out`, or to `status` when a structured format was
/// requested so that `out` carries only the re-serialized create response.
pub fn create_floating_ip<A, O, S>(
    api: &A,
    waiter: &dyn ActionWaiter,
    request: &FloatingIpCreateRequest,
    out: &mut O,
    status: &mut S,
) -> Result<FloatingIp>
where
    A: FloatingIpActions + ResourceDirectory<Server> + ?Sized,
    O: Write,
    S: Write,
{
    if request.home_location.is_none() && request.server.is_none() {
        return Err(Error::InvalidArgument(
            "one of --home-location or --server is required".into(),
        ));
    }
    let server = match &request.server {
        Some(id_or_name) => Some(
            api.resolve(id_or_name)?
                .ok_or_else(|| Error::not_found("Server", id_or_name.as_str()))?
                .id,
        ),
        None => None,
    };
    let opts = FloatingIpCreateOpts {
        ip_type: request.ip_type,
        name: request.name.clone(),
        home_location: request.home_location.clone(),
        server,
        description: request.description.clone().unwrap_or_default(),
        labels: request.labels.clone(),
    };

    let created = api.create(&opts)?;
    if let Some(action) = &created.action {
        waiter.wait(action)?;
    }
    let floating_ip = created.floating_ip;

    {
        let status_out: &mut dyn Write = if request.mode.is_structured() {
            &mut *status
        } else {
            &mut *out
        };
        writeln!(status_out, "Floating IP {} created", floating_ip.id)?;

        if request.protection.contains(&ProtectionLevel::Delete) {
            let action = api.change_protection(&floating_ip, true)?;
            waiter.wait(&action)?;
            writeln!(
                status_out,
                "Resource protection enabled for floating IP {}",
                floating_ip.id
            )?;
        }
    }

    match request.mode {
        OutputMode::Passthrough(format) => describe_raw(format, &created.raw, out)?,
        OutputMode::Graph => {
            writeln!(out, "{}: {}", floating_ip.ip_type.label(), floating_ip.ip)?
        }
    }
    Ok(floating_ip)
}
