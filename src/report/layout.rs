//! Fixed geometry of the report slides.

use super::deck::{
    Color, Element, Outline, PictureBox, Rect, ShapeBox, Slide, TextBox, TextRun, TextStyle,
    SLIDE_HEIGHT, SLIDE_WIDTH,
};
use super::{format, ImageError, Picture};
use crate::model::{Campaign, CampaignImage};
use time::{OffsetDateTime, UtcOffset};

pub const SUBTITLE: &str = "Campaign Report";

const TITLE_BACKGROUND: Color = Color("F0F4F8");
const ACCENT: Color = Color("1E40AF");
const HEADING: Color = Color("1F2937");
const LABEL: Color = Color("4B5563");
const VALUE: Color = Color("374151");
const PANEL_FILL: Color = Color("F8F9FA");
const PANEL_OUTLINE: Color = Color("E5E7EB");
const CAPTION: Color = Color("6B7280");
const ERROR: Color = Color("FF0000");

/// Left ~70% of the slide
pub const PICTURE_REGION: Rect = Rect::new(0.2, 0.4, 7.0, 4.8);
/// Right ~30% of the slide
pub const INFO_PANEL: Rect = Rect::new(7.3, 0.4, 2.5, 4.8);

const PANEL_TEXT_X: f64 = 7.45;
const PANEL_TEXT_W: f64 = 2.2;

pub fn title_slide(campaign: &Campaign, generated_at: OffsetDateTime, offset: UtcOffset) -> Slide {
    let mut slide = Slide {
        background: Some(TITLE_BACKGROUND),
        elements: vec![],
    };
    slide.add(Element::Shape(ShapeBox {
        rect: Rect::new(0.0, 0.0, SLIDE_WIDTH * 0.05, SLIDE_HEIGHT),
        fill: ACCENT,
        outline: None,
    }));
    slide.add_text(TextBox::new(
        Rect::new(1.0, 0.8, SLIDE_WIDTH * 0.8, 1.0),
        campaign.name.clone(),
        TextStyle::new(48.0, HEADING).bold(),
    ));
    slide.add_text(TextBox::new(
        Rect::new(1.0, 1.8, SLIDE_WIDTH * 0.8, 0.6),
        SUBTITLE,
        TextStyle::new(28.0, LABEL),
    ));

    let duration = format!(
        "{} - {}",
        format::date(campaign.start_date.as_ref().and_then(|it| it.parse()), offset),
        format::date(campaign.end_date.as_ref().and_then(|it| it.parse()), offset),
    );
    let boards = campaign
        .board_count()
        .map(|it| it.to_string())
        .unwrap_or_else(|| format::NOT_AVAILABLE.into());
    let details = [
        ("Generated: ", format::date(Some(generated_at), offset)),
        ("Client: ", format::or_not_available(campaign.client_email())),
        ("Duration: ", duration),
        ("Number of Boards: ", boards),
    ];
    let label = TextStyle::new(14.0, LABEL).bold();
    let value = TextStyle::new(14.0, VALUE);
    let last = details.len() - 1;
    let mut runs = vec![];
    for (i, (name, text)) in details.into_iter().enumerate() {
        runs.push(TextRun {
            text: name.into(),
            style: label,
        });
        runs.push(TextRun {
            text: if i == last { text } else { format!("{text}\n\n") },
            style: value,
        });
    }
    slide.add_text(TextBox {
        rect: Rect::new(1.0, 2.8, SLIDE_WIDTH * 0.8, 2.6),
        runs,
        line_spacing_pt: Some(16.0),
    });
    slide
}

/// Slide for image `index` (0-based). A failed image gets an error message
/// in place of the picture and details.
pub fn image_slide(
    index: usize,
    total: usize,
    image: &CampaignImage,
    outcome: Result<Picture, ImageError>,
    offset: UtcOffset,
) -> Slide {
    let mut slide = Slide::default();
    let picture = match outcome {
        Ok(picture) => picture,
        Err(err) => {
            slide.add_text(TextBox::new(
                Rect::new(1.0, 2.0, 8.0, 1.2),
                error_message(index, &err),
                TextStyle::new(18.0, ERROR),
            ));
            return slide;
        }
    };

    slide.add(Element::Picture(PictureBox {
        rect: picture.contain(PICTURE_REGION),
        picture,
    }));
    slide.add(Element::Shape(ShapeBox {
        rect: INFO_PANEL,
        fill: PANEL_FILL,
        outline: Some(Outline {
            color: PANEL_OUTLINE,
            width_pt: 1.0,
        }),
    }));

    let label = TextStyle::new(11.0, LABEL).bold();
    let value = TextStyle::new(10.0, VALUE);
    let panel = |y: f64, h: f64| Rect::new(PANEL_TEXT_X, y, PANEL_TEXT_W, h);

    slide.add_text(TextBox::new(
        panel(0.5, 0.4),
        "Image Details",
        TextStyle::new(16.0, HEADING).bold(),
    ));
    slide.add_text(TextBox::new(panel(1.0, 0.3), "Board:", label));
    slide.add_text(TextBox::new(
        panel(1.3, 0.4),
        format::or_not_available(image.board_details()),
        value,
    ));
    if let Some(quantity) = image.board_quantity() {
        slide.add_text(TextBox::new(
            panel(1.8, 0.3),
            format!("Qty: {quantity}"),
            TextStyle::new(10.0, ACCENT).bold(),
        ));
    }
    slide.add_text(TextBox::new(panel(2.2, 0.3), "Location:", label));
    slide.add_text(TextBox::new(
        panel(2.5, 0.5),
        format::or_not_available(image.location()),
        value,
    ));
    slide.add_text(TextBox::new(panel(3.1, 0.3), "Date:", label));
    slide.add_text(TextBox::new(
        panel(3.4, 0.3),
        format::date_time(image.captured_at(), offset),
        value,
    ));
    slide.add_text(TextBox::new(panel(3.8, 0.3), "Role:", label));
    slide.add_text(TextBox::new(panel(4.1, 0.3), image.role(), value));

    slide.add_text(TextBox::new(
        Rect::new(0.5, 5.3, 6.0, 0.25),
        format!("Image {} of {}", index + 1, total),
        TextStyle::new(9.0, CAPTION).italic(),
    ));
    slide
}

pub fn error_message(index: usize, err: &ImageError) -> String {
    format!("Error loading image #{}\n{}", index + 1, err)
}

#[cfg(test)]
mod test {
    use super::{image_slide, title_slide, INFO_PANEL, PICTURE_REGION};
    use crate::model::{Campaign, CampaignImage};
    use crate::report::deck::Element;
    use crate::report::picture::test::png;
    use crate::report::{ImageError, Picture};
    use time::{macros::datetime, UtcOffset};

    #[test]
    fn title_slide_details() {
        let slide = title_slide(
            &Campaign::mock(),
            datetime!(2025-02-03 09:00 UTC),
            UtcOffset::UTC,
        );
        let texts = slide.texts();
        assert_eq!("Eid Drive", texts[0]);
        assert_eq!("Campaign Report", texts[1]);
        assert_eq!(
            "Generated: 2/3/2025\n\nClient: c@x.com\n\nDuration: 1/1/2025 - 1/31/2025\n\nNumber of Boards: 2",
            texts[2]
        );
        assert!(matches!(slide.elements[0], Element::Shape(_)));
    }

    #[test]
    fn title_slide_missing_details() {
        let campaign = Campaign {
            client_email: None,
            start_date: None,
            no_of_boards: None,
            ..Campaign::mock()
        };
        let slide = title_slide(&campaign, datetime!(2025-02-03 09:00 UTC), UtcOffset::UTC);
        let details = &slide.texts()[2];
        assert!(details.contains("Client: N/A"));
        assert!(details.contains("Duration: N/A - 1/31/2025"));
        assert!(details.ends_with("Number of Boards: N/A"));
    }

    #[test]
    fn image_slide_panel() {
        let image = CampaignImage {
            board_details: Some("LHR-12 - Mall Road".into()),
            board_quantity: Some(3),
            live_location: Some("Mall Road".into()),
            uploaded_at: Some("2025-01-05T10:00:00Z".into()),
            ..CampaignImage::mock("https://ok/1.png")
        };
        let picture = Picture::decode(png(700, 480)).unwrap();
        let slide = image_slide(0, 2, &image, Ok(picture), UtcOffset::UTC);
        assert_eq!(
            vec![
                "Image Details",
                "Board:",
                "LHR-12 - Mall Road",
                "Qty: 3",
                "Location:",
                "Mall Road",
                "Date:",
                "05 Jan 2025, 10:00 AM",
                "Role:",
                "Tracker",
                "Image 1 of 2",
            ],
            slide.texts()
        );
        let picture = slide.pictures().next().unwrap();
        assert!(picture.rect.x >= PICTURE_REGION.x);
        assert!(picture.rect.x + picture.rect.w <= INFO_PANEL.x);
        assert!(picture.rect.y + picture.rect.h <= PICTURE_REGION.y + PICTURE_REGION.h + 1e-9);
    }

    #[test]
    fn image_slide_without_quantity_or_details() {
        let image = CampaignImage::mock("https://ok/1.png");
        let picture = Picture::decode(png(10, 10)).unwrap();
        let texts = image_slide(4, 5, &image, Ok(picture), UtcOffset::UTC).texts();
        assert!(!texts.iter().any(|it| it.starts_with("Qty")));
        assert_eq!("N/A", texts[2]);
        assert_eq!("N/A", texts[4]);
        assert_eq!("N/A", texts[6]);
        assert_eq!("Image 5 of 5", texts[9]);
    }

    #[test]
    fn image_slide_unparsable_first_date() {
        let image = CampaignImage {
            uploaded_at: Some("not a date".into()),
            created_at: Some("2025-01-05T10:00:00Z".into()),
            ..CampaignImage::mock("https://ok/1.png")
        };
        let picture = Picture::decode(png(10, 10)).unwrap();
        let texts = image_slide(0, 1, &image, Ok(picture), UtcOffset::UTC).texts();
        assert_eq!("Date:", texts[5]);
        assert_eq!("N/A", texts[6]);
    }

    #[test]
    fn error_slide() {
        let image = CampaignImage::mock("https://broken/2.png");
        let err = ImageError::Fetch("Failed to fetch image: https://broken/2.png (404)".into());
        let slide = image_slide(1, 2, &image, Err(err), UtcOffset::UTC);
        assert_eq!(
            vec!["Error loading image #2\nFailed to fetch image: https://broken/2.png (404)"],
            slide.texts()
        );
        assert_eq!(0, slide.pictures().count());
    }
}
