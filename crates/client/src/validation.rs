use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

pub const USERNAME_MAX_CHARS: usize = 150;
pub const PASSWORD_MAX_CHARS: usize = 128;
pub const ROOM_NAME_MAX_CHARS: usize = 100;
pub const MESSAGE_MAX_CHARS: usize = 2000;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.@+-]+$").expect("username pattern is valid"));

/// Form field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Username,
    Password,
    RoomName,
    Content,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
            Self::RoomName => "name",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-keyed validation failures, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<Field, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn messages(&self, field: Field) -> &[String] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First message for `field`, which is what a form shows under the input.
    pub fn first(&self, field: Field) -> Option<&str> {
        self.messages(field).first().map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.keys().copied()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Credentials that passed the login form checks.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginInput {
    username: String,
    password: String,
}

impl LoginInput {
    pub fn parse(username: &str, password: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let username = username.trim();

        let username_len = username.chars().count();
        if username_len == 0 {
            errors.push(Field::Username, "Username is required");
        } else if username_len > USERNAME_MAX_CHARS {
            errors.push(Field::Username, "Username must be less than 150 characters");
        }
        if username_len > 0 && !USERNAME_PATTERN.is_match(username) {
            errors.push(
                Field::Username,
                "Username can only contain letters, numbers, and @/./+/-/_ characters",
            );
        }

        // Passwords are taken verbatim.
        let password_len = password.chars().count();
        if password_len == 0 {
            errors.push(Field::Password, "Password is required");
        } else if password_len > PASSWORD_MAX_CHARS {
            errors.push(Field::Password, "Password must be less than 128 characters");
        }

        errors.into_result(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn into_parts(self) -> (String, String) {
        (self.username, self.password)
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Trimmed room name, 1 to 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomName(String);

impl RoomName {
    pub fn parse(raw: &str) -> Result<Self, ValidationErrors> {
        let name = trimmed_within(
            raw,
            ROOM_NAME_MAX_CHARS,
            Field::RoomName,
            "Room name is required",
            "Room name must be less than 100 characters",
        )?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Trimmed message body, 1 to 2000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn parse(raw: &str) -> Result<Self, ValidationErrors> {
        let content = trimmed_within(
            raw,
            MESSAGE_MAX_CHARS,
            Field::Content,
            "Message cannot be empty",
            "Message must be less than 2000 characters",
        )?;
        Ok(Self(content))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

fn trimmed_within(
    raw: &str,
    max_chars: usize,
    field: Field,
    empty_message: &str,
    too_long_message: &str,
) -> Result<String, ValidationErrors> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();

    if len == 0 {
        return Err(ValidationErrors::single(field, empty_message));
    }
    if len > max_chars {
        return Err(ValidationErrors::single(field, too_long_message));
    }

    Ok(trimmed.to_string())
}
