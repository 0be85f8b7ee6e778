//! Host document seam: the only place gate side effects become observable.

use crate::cookie::{CookieDirective, CookieScope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Command pushed onto the vendor's data layer once the loader has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "arg", rename_all = "lowercase")]
pub enum GtagCommand {
    /// `gtag('js', <date>)`
    Js(DateTime<Utc>),
    /// `gtag('config', <measurement id>)`
    Config(String),
}

/// `<script async src=..>` appended to the document head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptElement {
    pub src: String,
    pub async_load: bool,
    /// Commands the host runs once the script finishes loading.
    pub on_load: Vec<GtagCommand>,
}

/// What the gate needs from the page it runs in.
pub trait HostDocument {
    fn hostname(&self) -> &str;
    fn has_script(&self, src: &str) -> bool;
    fn append_script(&mut self, script: ScriptElement);
    /// Names of cookies currently visible to the page.
    fn cookie_names(&self) -> Vec<String>;
    fn write_cookie(&mut self, directive: &CookieDirective);
}

/// In-memory document. Cookies are keyed by name and scope, so clearing
/// under the wrong scope leaves the cookie in place, as in a browser.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    hostname: String,
    scripts: Vec<ScriptElement>,
    loaded_scripts: usize,
    cookies: BTreeMap<(String, CookieScope), String>,
    cookie_writes: Vec<String>,
    data_layer: Vec<GtagCommand>,
}

impl MemoryDocument {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Default::default()
        }
    }

    /// Seed a cookie as if a script had set it under `scope`.
    pub fn set_cookie(&mut self, name: &str, value: &str, scope: CookieScope) {
        self.cookies
            .insert((name.to_string(), scope), value.to_string());
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.keys().any(|(n, _)| n == name)
    }

    pub fn cookie_scopes(&self, name: &str) -> Vec<CookieScope> {
        self.cookies
            .keys()
            .filter(|(n, _)| n == name)
            .map(|(_, scope)| *scope)
            .collect()
    }

    pub fn scripts(&self) -> &[ScriptElement] {
        &self.scripts
    }

    pub fn script_count(&self, src: &str) -> usize {
        self.scripts.iter().filter(|s| s.src == src).count()
    }

    /// Raw `document.cookie` assignments in the order they were made.
    pub fn cookie_writes(&self) -> &[String] {
        &self.cookie_writes
    }

    pub fn data_layer(&self) -> &[GtagCommand] {
        &self.data_layer
    }

    /// Simulate the network finishing: every script appended since the last
    /// call fires its on-load commands once.
    pub fn complete_script_loads(&mut self) {
        for script in &self.scripts[self.loaded_scripts..] {
            self.data_layer.extend(script.on_load.iter().cloned());
        }
        self.loaded_scripts = self.scripts.len();
    }
}

impl HostDocument for MemoryDocument {
    fn hostname(&self) -> &str {
        &self.hostname
    }

    fn has_script(&self, src: &str) -> bool {
        self.scripts.iter().any(|s| s.src == src)
    }

    fn append_script(&mut self, script: ScriptElement) {
        self.scripts.push(script);
    }

    fn cookie_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.cookies.keys().map(|(n, _)| n.clone()).collect();
        names.dedup();
        names
    }

    fn write_cookie(&mut self, directive: &CookieDirective) {
        self.cookie_writes.push(directive.to_string());
        self.cookies
            .remove(&(directive.name.clone(), directive.scope));
    }
}
