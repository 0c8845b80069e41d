//! Text layout of a single tag
//!
//! Offsets are relative to the image centre. The group line is left-aligned;
//! name and detail are centred. Without a group the name and detail move to
//! their own offsets so the block stays visually centred.

use roster::PersonRecord;
use serde::{Deserialize, Serialize};
use sheet_core::{Align, TextStyle};

/// Which field a text line shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Group,
    Name,
    Detail,
}

/// One positioned line of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub kind: LineKind,
    pub text: String,
    /// Anchor x (left edge for left-aligned lines, centre otherwise)
    pub x: f32,
    /// Vertical middle of the line
    pub y: f32,
    pub style: TextStyle,
}

/// Font sizes and offsets for one tag size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagLayout {
    pub name_size: f32,
    pub group_size: f32,
    pub detail_size: f32,
    /// Group x as a fraction of the image width
    pub group_left: f32,
    pub group_dy: f32,
    pub name_dy: f32,
    pub detail_dy: f32,
    pub name_dy_without_group: f32,
    pub detail_dy_without_group: f32,
}

impl TagLayout {
    /// Student (small) tag
    pub const SMALL: TagLayout = TagLayout {
        name_size: 100.0,
        group_size: 44.0,
        detail_size: 60.0,
        group_left: 0.10,
        group_dy: -60.0,
        name_dy: 20.0,
        detail_dy: 120.0,
        name_dy_without_group: -20.0,
        detail_dy_without_group: 80.0,
    };

    /// Non-student (big) tag
    pub const BIG: TagLayout = TagLayout {
        name_size: 180.0,
        group_size: 64.0,
        detail_size: 120.0,
        group_left: 0.15,
        group_dy: -160.0,
        name_dy: 40.0,
        detail_dy: 200.0,
        name_dy_without_group: 10.0,
        detail_dy_without_group: 170.0,
    };

    /// Lay out the person's lines on a `width` x `height` background
    pub fn plan(&self, person: &PersonRecord, width: u32, height: u32) -> Vec<TextLine> {
        let center_x = width as f32 / 2.0;
        let center_y = height as f32 / 2.0;
        let name_style = TextStyle::new(self.name_size).bold().align(Align::Center);
        let detail_style = TextStyle::new(self.detail_size).align(Align::Center);

        let mut lines = Vec::with_capacity(3);

        let (name_dy, detail_dy) = if person.has_group() {
            lines.push(TextLine {
                kind: LineKind::Group,
                text: person.group().to_string(),
                x: width as f32 * self.group_left,
                y: center_y + self.group_dy,
                style: TextStyle::new(self.group_size).align(Align::Left),
            });
            (self.name_dy, self.detail_dy)
        } else {
            (self.name_dy_without_group, self.detail_dy_without_group)
        };

        lines.push(TextLine {
            kind: LineKind::Name,
            text: person.name().to_string(),
            x: center_x,
            y: center_y + name_dy,
            style: name_style,
        });
        lines.push(TextLine {
            kind: LineKind::Detail,
            text: person.detail().to_string(),
            x: center_x,
            y: center_y + detail_dy,
            style: detail_style,
        });

        lines
    }
}
