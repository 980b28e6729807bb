//! Reply payloads for the LINE Messaging API
//!
//! These types serialize to the JSON message objects the reply endpoint
//! accepts: plain text messages and Flex messages holding a single bubble.

use serde::{Deserialize, Serialize};

/// Message sent back through the reply API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyMessage {
    /// Plain text message
    Text { text: String },

    /// Flex message carrying a card
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        contents: FlexBubble,
    },
}

impl ReplyMessage {
    /// Create a plain text message
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a Flex message
    pub fn flex(alt_text: impl Into<String>, contents: FlexBubble) -> Self {
        Self::Flex {
            alt_text: alt_text.into(),
            contents,
        }
    }

    /// Whether this is a Flex card
    pub fn is_flex(&self) -> bool {
        matches!(self, Self::Flex { .. })
    }

    /// Alt text of a Flex message
    pub fn alt_text(&self) -> Option<&str> {
        match self {
            Self::Flex { alt_text, .. } => Some(alt_text),
            Self::Text { .. } => None,
        }
    }

    /// All visible text: the message itself, or every text component of the card
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Text { text } => vec![text.as_str()],
            Self::Flex { contents, .. } => contents.texts(),
        }
    }
}

/// Flex bubble container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "bubble")]
pub struct FlexBubble {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero: Option<FlexComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<FlexComponent>,
}

impl FlexBubble {
    /// Text of every text component, in document order
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for component in self.hero.iter().chain(self.body.iter()) {
            component.collect_texts(&mut out);
        }
        out
    }

    /// URL of the hero image, if any
    pub fn hero_url(&self) -> Option<&str> {
        match &self.hero {
            Some(FlexComponent::Image { url, .. }) => Some(url),
            _ => None,
        }
    }
}

/// Flex component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexComponent {
    /// Image component
    #[serde(rename_all = "camelCase")]
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        aspect_ratio: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        aspect_mode: Option<String>,
    },

    /// Box laying out child components
    Box {
        layout: BoxLayout,
        contents: Vec<FlexComponent>,
    },

    /// Text component
    Text {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
}

/// Box layout direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxLayout {
    Vertical,
}

impl FlexComponent {
    /// Full-width cover image
    pub fn hero_image(url: impl Into<String>) -> Self {
        Self::Image {
            url: url.into(),
            size: Some("full".to_string()),
            aspect_ratio: Some("20:13".to_string()),
            aspect_mode: Some("cover".to_string()),
        }
    }

    /// Vertical box
    pub fn vertical(contents: Vec<FlexComponent>) -> Self {
        Self::Box {
            layout: BoxLayout::Vertical,
            contents,
        }
    }

    /// Text with a size and optional color
    pub fn text(text: impl Into<String>, size: &str, color: Option<&str>) -> Self {
        Self::Text {
            text: text.into(),
            weight: None,
            size: Some(size.to_string()),
            color: color.map(str::to_string),
        }
    }

    /// Bold text
    pub fn bold_text(text: impl Into<String>, size: &str) -> Self {
        Self::Text {
            text: text.into(),
            weight: Some("bold".to_string()),
            size: Some(size.to_string()),
            color: None,
        }
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Text { text, .. } => out.push(text),
            Self::Box { contents, .. } => {
                for child in contents {
                    child.collect_texts(out);
                }
            }
            Self::Image { .. } => {}
        }
    }
}
