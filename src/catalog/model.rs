use std::{collections::HashSet, path::Path};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::core::MediaKind,
    foundation::error::{MediaError, MediaResult},
};

/// One placeholder asset to synthesize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRequest {
    /// Globally unique id, used as the output file stem.
    pub id: String,
    /// Container to produce.
    pub kind: MediaKind,
    /// Palette / icon category; unknown tags are allowed.
    #[serde(default)]
    pub category: String,
    /// Short caption drawn centered by the rich renderer.
    #[serde(default)]
    pub label: String,
    /// Longer caption, word-wrapped under the label.
    #[serde(default, alias = "desc")]
    pub description: String,
    /// Voice length in whole seconds; ignored for images.
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,
}

impl MediaRequest {
    /// Image request.
    pub fn image(
        id: impl Into<String>,
        category: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: MediaKind::Image,
            category: category.into(),
            label: label.into(),
            description: description.into(),
            duration_seconds: None,
        }
    }

    /// Voice-note request.
    pub fn voice(id: impl Into<String>, duration_seconds: i64) -> Self {
        Self {
            id: id.into(),
            kind: MediaKind::Voice,
            category: VOICE_CATEGORY.to_string(),
            label: String::new(),
            description: String::new(),
            duration_seconds: Some(duration_seconds),
        }
    }
}

const VOICE_CATEGORY: &str = "voice";

/// Media requests belonging to one chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMedia {
    /// Chat identifier (informational; not part of output paths).
    pub chat_id: String,
    /// Requests in catalog order.
    #[serde(default)]
    pub media: Vec<MediaRequest>,
}

impl ChatMedia {
    /// Group `media` under `chat_id`.
    pub fn new(chat_id: impl Into<String>, media: Vec<MediaRequest>) -> Self {
        Self {
            chat_id: chat_id.into(),
            media,
        }
    }
}

/// Ordered collection of chat-scoped media requests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    /// Chats in document order.
    pub chats: Vec<ChatMedia>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DemoChat {
    #[serde(default)]
    images: Vec<DemoImage>,
    #[serde(default)]
    voice: Vec<DemoVoice>,
}

#[derive(Deserialize)]
struct DemoImage {
    id: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    category: String,
    #[serde(default, alias = "desc")]
    description: String,
}

#[derive(Deserialize)]
struct DemoVoice {
    id: String,
    #[serde(alias = "duration")]
    duration_seconds: Option<i64>,
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;
        use serde_json::Value;

        match Value::deserialize(deserializer)? {
            list @ Value::Array(_) => {
                let chats = serde_json::from_value(list).map_err(D::Error::custom)?;
                Ok(Self { chats })
            }
            Value::Object(mut map)
                if map.len() == 1 && map.get("chats").is_some_and(Value::is_array) =>
            {
                let list = map.remove("chats").unwrap_or_default();
                let chats = serde_json::from_value(list)
                    .map_err(|e| D::Error::custom(format!("chats: {e}")))?;
                Ok(Self { chats })
            }
            Value::Object(map) => {
                let mut chats = Vec::with_capacity(map.len());
                for (chat_id, body) in map {
                    let body: DemoChat = serde_json::from_value(body)
                        .map_err(|e| D::Error::custom(format!("chat '{chat_id}': {e}")))?;
                    chats.push(ChatMedia::new(chat_id, body.into_requests()));
                }
                Ok(Self { chats })
            }
            other => Err(D::Error::custom(format!(
                "catalog must be a list of chats or an object keyed by chat id, got {other}"
            ))),
        }
    }
}

impl DemoChat {
    fn into_requests(self) -> Vec<MediaRequest> {
        let images = self
            .images
            .into_iter()
            .map(|i| MediaRequest::image(i.id, i.category, i.label, i.description));
        let voice = self.voice.into_iter().map(|v| MediaRequest {
            duration_seconds: v.duration_seconds,
            ..MediaRequest::voice(v.id, 0)
        });
        images.chain(voice).collect()
    }
}

impl Catalog {
    /// Catalog from chats in order.
    pub fn new(chats: Vec<ChatMedia>) -> Self {
        Self { chats }
    }

    /// Parse catalog JSON.
    ///
    /// Accepts a list of `{chat_id, media}` objects, `{ "chats": [...] }`, or the demo shape
    /// `{ "<chat-id>": { "images": [...], "voice": [...] } }` (document order is kept).
    pub fn from_json_str(s: &str) -> MediaResult<Self> {
        serde_json::from_str(s).map_err(|e| MediaError::serde(format!("catalog: {e}")))
    }

    /// Read and parse a catalog file.
    pub fn from_path(path: &Path) -> MediaResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read catalog '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Every request paired with its chat id, in catalog order.
    pub fn requests(&self) -> impl Iterator<Item = (&str, &MediaRequest)> {
        self.chats
            .iter()
            .flat_map(|c| c.media.iter().map(move |m| (c.chat_id.as_str(), m)))
    }

    /// Total number of requests.
    pub fn len(&self) -> usize {
        self.chats.iter().map(|c| c.media.len()).sum()
    }

    /// Whether the catalog holds no requests.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Structural checks performed before any file is written.
    ///
    /// Rejects duplicate ids (across all chats and kinds, compared case-insensitively so two ids
    /// never share a file on case-folding filesystems) and ids that are not safe file stems.
    pub fn validate(&self) -> MediaResult<()> {
        let mut seen = HashSet::<String>::with_capacity(self.len());
        for (chat_id, req) in self.requests() {
            validate_id(&req.id).map_err(|e| {
                MediaError::validation(format!("chat '{chat_id}': {e}"))
            })?;
            if !seen.insert(req.id.to_lowercase()) {
                return Err(MediaError::DuplicateRequestId(req.id.clone()));
            }
        }
        Ok(())
    }
}

/// Check that `id` can be used verbatim as a file stem inside the output directory.
pub fn validate_id(id: &str) -> MediaResult<()> {
    if id.trim().is_empty() {
        return Err(MediaError::validation("request id must be non-empty"));
    }
    if id.starts_with('.') {
        return Err(MediaError::validation(format!(
            "request id '{id}' must not start with '.'"
        )));
    }
    if let Some(c) = id
        .chars()
        .find(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
    {
        return Err(MediaError::validation(format!(
            "request id '{}' contains forbidden character {c:?}",
            id.escape_debug()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;
