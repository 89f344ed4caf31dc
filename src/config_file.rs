use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::verbose_println;

pub const PREFERENCES_GROUP: &str = "preferences";
pub const KEY_PHOTO_PATH: &str = "photo_path";
pub const KEY_X: &str = "x";
pub const KEY_Y: &str = "y";
pub const KEY_MAX_SIZE: &str = "max_size";

/// Bound used when `max_size` is not configured
pub const DEFAULT_MAX_SIZE: u32 = 300;

/// Type tag for a configuration lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
}

/// A typed configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    String(String),
    Integer(i32),
}

impl ConfigValue {
    /// The value a lookup of `kind` yields when the key is absent
    pub fn default_for(kind: ValueKind) -> Self {
        match kind {
            ValueKind::String => ConfigValue::String(String::new()),
            ValueKind::Integer => ConfigValue::Integer(0),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::String(_) => ValueKind::String,
            ConfigValue::Integer(_) => ValueKind::Integer,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            ConfigValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            ConfigValue::String(_) => None,
        }
    }

    fn to_raw(&self) -> String {
        match self {
            ConfigValue::String(s) => escape_value(s),
            ConfigValue::Integer(i) => i.to_string(),
        }
    }

    fn from_raw(raw: &str, kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::String => unescape_value(raw).map(ConfigValue::String),
            ValueKind::Integer => raw.trim().parse::<i32>().ok().map(ConfigValue::Integer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Comment(String),
    Entry { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Group {
    name: String,
    lines: Vec<Line>,
}

/// In-memory form of a GLib-style key file.
///
/// Groups, keys and comments keep their original order so that a rewrite
/// leaves everything it did not touch exactly where it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFile {
    header: Vec<String>,
    groups: Vec<Group>,
}

impl KeyFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse key file text. Any line that is neither blank, a `#` comment,
    /// a `[group]` header nor a `key=value` pair inside a group is an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut keyfile = KeyFile::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim_start();
            let line_no = index + 1;

            if line.is_empty() || line.starts_with('#') {
                let comment = raw_line.to_string();
                match keyfile.groups.last_mut() {
                    Some(group) => group.lines.push(Line::Comment(comment)),
                    None => keyfile.header.push(comment),
                }
                continue;
            }

            if line.starts_with('[') {
                let name = line
                    .trim_end()
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .filter(|name| !name.is_empty() && !name.contains(['[', ']']))
                    .ok_or_else(|| anyhow!("Invalid group header on line {}: {}", line_no, line))?;
                if keyfile.group_index(name).is_none() {
                    keyfile.groups.push(Group {
                        name: name.to_string(),
                        lines: Vec::new(),
                    });
                }
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| anyhow!("Line {} is not a key=value pair: {}", line_no, line))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(anyhow!("Empty key on line {}", line_no));
            }

            let group = keyfile
                .groups
                .last_mut()
                .ok_or_else(|| anyhow!("Key '{}' on line {} is outside any group", key, line_no))?;
            let value = value.trim_start().to_string();

            // Duplicate keys: the last occurrence wins
            group
                .lines
                .retain(|l| !matches!(l, Line::Entry { key: k, .. } if k == key));
            group.lines.push(Line::Entry {
                key: key.to_string(),
                value,
            });
        }

        Ok(keyfile)
    }

    /// Read and parse a key file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Serialize the whole key file
    pub fn to_data(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 && !out.ends_with("\n\n") {
                out.push('\n');
            }
            out.push('[');
            out.push_str(&group.name);
            out.push_str("]\n");
            for line in &group.lines {
                match line {
                    Line::Comment(text) => out.push_str(text),
                    Line::Entry { key, value } => {
                        out.push_str(key);
                        out.push('=');
                        out.push_str(value);
                    }
                }
                out.push('\n');
            }
        }
        out
    }

    fn group_index(&self, group: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == group)
    }

    fn raw(&self, group: &str, key: &str) -> Option<&str> {
        let group = &self.groups[self.group_index(group)?];
        group.lines.iter().find_map(|line| match line {
            Line::Entry { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Typed lookup. `None` when the key is absent or does not convert.
    pub fn value(&self, group: &str, key: &str, kind: ValueKind) -> Option<ConfigValue> {
        self.raw(group, key)
            .and_then(|raw| ConfigValue::from_raw(raw, kind))
    }

    pub fn string(&self, group: &str, key: &str) -> Option<String> {
        match self.value(group, key, ValueKind::String)? {
            ConfigValue::String(s) => Some(s),
            ConfigValue::Integer(_) => None,
        }
    }

    pub fn integer(&self, group: &str, key: &str) -> Option<i32> {
        self.value(group, key, ValueKind::Integer)?.as_integer()
    }

    /// Overwrite a single key, creating its group at the end if needed
    pub fn set_value(&mut self, group: &str, key: &str, value: &ConfigValue) {
        let index = match self.group_index(group) {
            Some(index) => index,
            None => {
                self.groups.push(Group {
                    name: group.to_string(),
                    lines: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        let raw = value.to_raw();
        let lines = &mut self.groups[index].lines;

        for line in lines.iter_mut() {
            if let Line::Entry { key: k, value: v } = line {
                if k.as_str() == key {
                    *v = raw;
                    return;
                }
            }
        }

        // Keep trailing blank lines after the new key so groups stay separated
        let insert_at = lines
            .iter()
            .rposition(|l| !matches!(l, Line::Comment(c) if c.trim().is_empty()))
            .map_or(0, |i| i + 1);
        lines.insert(
            insert_at,
            Line::Entry {
                key: key.to_string(),
                value: raw,
            },
        );
    }
}

/// Escape a string the way GLib key files store it
fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            ' ' if i == 0 => out.push_str("\\s"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape_value`]. An unknown or dangling escape is invalid.
fn unescape_value(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            's' => out.push(' '),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            _ => return None,
        }
    }
    Some(out)
}

/// File-backed configuration. Every call re-reads the file; every write
/// rewrites it whole.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    verbose: bool,
}

impl ConfigStore {
    pub fn new(path: PathBuf, verbose: bool) -> Self {
        Self { path, verbose }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the backing file, logging instead of failing
    pub fn load(&self) -> Option<KeyFile> {
        match KeyFile::load(&self.path) {
            Ok(keyfile) => Some(keyfile),
            Err(e) => {
                verbose_println(self.verbose, &format!("Error: {:#}", e));
                None
            }
        }
    }

    /// Look up a key, falling back to the zero value of `kind`
    pub fn get(&self, group: &str, key: &str, kind: ValueKind) -> ConfigValue {
        self.get_or(group, key, ConfigValue::default_for(kind))
    }

    /// Look up a key with an explicit default; the default's variant picks the kind
    pub fn get_or(&self, group: &str, key: &str, default: ConfigValue) -> ConfigValue {
        self.load()
            .and_then(|keyfile| keyfile.value(group, key, default.kind()))
            .unwrap_or(default)
    }

    /// Overwrite one key and rewrite the file. Returns false only when the
    /// file cannot be written.
    pub fn set(&self, group: &str, key: &str, value: ConfigValue) -> bool {
        self.set_many(group, &[(key, value)])
    }

    /// Overwrite several keys of one group with a single rewrite
    pub fn set_many(&self, group: &str, values: &[(&str, ConfigValue)]) -> bool {
        let mut keyfile = if self.exists() {
            self.load().unwrap_or_default()
        } else {
            KeyFile::new()
        };
        for (key, value) in values {
            keyfile.set_value(group, key, value);
        }

        match self.write(&keyfile) {
            Ok(()) => true,
            Err(e) => {
                verbose_println(self.verbose, &format!("Error: {:#}", e));
                false
            }
        }
    }

    fn write(&self, keyfile: &KeyFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }
        fs::write(&self.path, keyfile.to_data())
            .with_context(|| format!("Cannot write to file: {}", self.path.display()))
    }
}

/// The `[preferences]` group as read at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub photo_path: Option<PathBuf>,
    pub x: i32,
    pub y: i32,
    pub max_size: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            photo_path: None,
            x: 0,
            y: 0,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl Preferences {
    /// Read all preferences with one file load
    pub fn load(store: &ConfigStore) -> Self {
        match store.load() {
            Some(keyfile) => Self::from_keyfile(&keyfile),
            None => Self::default(),
        }
    }

    pub fn from_keyfile(keyfile: &KeyFile) -> Self {
        let photo_path = keyfile
            .string(PREFERENCES_GROUP, KEY_PHOTO_PATH)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        // A negative bound in the file is treated like a missing one
        let max_size = keyfile
            .integer(PREFERENCES_GROUP, KEY_MAX_SIZE)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(DEFAULT_MAX_SIZE);

        Self {
            photo_path,
            x: keyfile.integer(PREFERENCES_GROUP, KEY_X).unwrap_or(0),
            y: keyfile.integer(PREFERENCES_GROUP, KEY_Y).unwrap_or(0),
            max_size,
        }
    }
}
