//! In-memory slide deck. Geometry is in inches, font sizes in points.

use super::Picture;
use time::OffsetDateTime;

/// 16:9 slide
pub const SLIDE_WIDTH: f64 = 10.0;
pub const SLIDE_HEIGHT: f64 = 5.625;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect { x, y, w, h }
    }
}

/// RGB hex without the leading '#'
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub &'static str);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(size_pt: f64, color: Color) -> TextStyle {
        TextStyle {
            size_pt,
            bold: false,
            italic: false,
            color,
        }
    }

    pub const fn bold(self) -> TextStyle {
        TextStyle { bold: true, ..self }
    }

    pub const fn italic(self) -> TextStyle {
        TextStyle {
            italic: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub rect: Rect,
    pub runs: Vec<TextRun>,
    pub line_spacing_pt: Option<f64>,
}

impl TextBox {
    pub fn new(rect: Rect, text: impl Into<String>, style: TextStyle) -> TextBox {
        TextBox {
            rect,
            runs: vec![TextRun {
                text: text.into(),
                style,
            }],
            line_spacing_pt: None,
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        self.runs.iter().map(|it| it.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Color,
    pub width_pt: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeBox {
    pub rect: Rect,
    pub fill: Color,
    pub outline: Option<Outline>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PictureBox {
    pub rect: Rect,
    pub picture: Picture,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Shape(ShapeBox),
    Text(TextBox),
    Picture(PictureBox),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slide {
    pub background: Option<Color>,
    pub elements: Vec<Element>,
}

impl Slide {
    pub fn add(&mut self, element: Element) -> &mut Slide {
        self.elements.push(element);
        self
    }

    pub fn add_text(&mut self, text: TextBox) -> &mut Slide {
        self.add(Element::Text(text))
    }

    /// Text of every text box, in placement order.
    #[cfg(test)]
    pub fn texts(&self) -> Vec<String> {
        self.elements
            .iter()
            .filter_map(|it| match it {
                Element::Text(text) => Some(text.text()),
                _ => None,
            })
            .collect()
    }

    pub fn pictures(&self) -> impl Iterator<Item = &PictureBox> {
        self.elements.iter().filter_map(|it| match it {
            Element::Picture(picture) => Some(picture),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub title: String,
    pub author: String,
    pub created_at: OffsetDateTime,
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        created_at: OffsetDateTime,
    ) -> Deck {
        Deck {
            title: title.into(),
            author: author.into(),
            created_at,
            slides: vec![],
        }
    }
}
