/// Record shapes exchanged with a presentation layer
///
/// A grid widget reports layouts as flat rectangles keyed by `i`, with
/// `y: null` meaning "below all content". These records convert to and from
/// the typed [`Placement`] model.

use serde::{Deserialize, Serialize};

use super::data::{ImageItem, LayoutItem, LayoutUpdate, Placement};

/// One rectangle of a layout snapshot
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    #[serde(rename = "i")]
    pub id: String,
    pub x: u32,
    /// `None` is the "below all content" request
    pub y: Option<u32>,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_draggable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_resizable: Option<bool>,
}

impl From<LayoutItem<'_>> for LayoutRecord {
    fn from(item: LayoutItem<'_>) -> Self {
        Self {
            id: item.id.to_string(),
            x: item.placement.x(),
            y: item.placement.y(),
            w: item.w,
            h: item.h,
            is_draggable: item.is_draggable,
            is_resizable: item.is_resizable,
        }
    }
}

impl From<LayoutRecord> for LayoutUpdate {
    fn from(record: LayoutRecord) -> Self {
        let placement = match record.y {
            Some(y) => Placement::Fixed { x: record.x, y },
            None => Placement::AppendAtEnd,
        };
        Self {
            id: record.id,
            placement,
            w: record.w,
            h: record.h,
            is_draggable: record.is_draggable,
            is_resizable: record.is_resizable,
        }
    }
}

/// An image as `{ id, src }` with `src` as a data URI
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: String,
    pub src: String,
}

impl From<&ImageItem> for ImageRecord {
    fn from(image: &ImageItem) -> Self {
        Self {
            id: image.id.clone(),
            src: image.src.data_uri(),
        }
    }
}
