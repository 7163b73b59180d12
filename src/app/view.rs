use super::messages::Message;
use super::state::App;
use crate::config::ThemeMode;
use iced::alignment::{Horizontal, Vertical};
use iced::font::{Style, Weight};
use iced::widget::text::{LineHeight, Rich, Span, Wrapping};
use iced::widget::{
    Column, button, column, container, horizontal_space, pick_list, row, scrollable, text,
};
use iced::{Color, Element, Font, Length};
use lesson_core::{IndicatorKind, ParagraphFrame, ParagraphKind, Segment, visible_fragments};

const FEEDBACK_COLOR: Color = Color {
    r: 0.18,
    g: 0.55,
    b: 0.34,
    a: 1.0,
};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let frame = self.timeline.frame();

        let theme_label = if matches!(self.config.theme, ThemeMode::Night) {
            "Day Mode"
        } else {
            "Night Mode"
        };

        let start_label = if frame.running { "Restart" } else { "Start" };
        let lesson_picker = pick_list(
            self.lessons.as_slice(),
            self.selected_lesson.as_ref(),
            Message::LessonSelected,
        )
        .placeholder("Built-in lesson");

        let controls = row![
            text(frame.title).size(22),
            horizontal_space(),
            lesson_picker,
            button(start_label).on_press(Message::StartLesson),
            button("New").on_press(Message::ResetLesson),
            button(theme_label).on_press(Message::ToggleTheme),
        ]
        .spacing(10)
        .align_y(Vertical::Center)
        .width(Length::Fill);

        let mut status = row![text(self.progress_label()).size(14)]
            .spacing(16)
            .align_y(Vertical::Center);
        if let Some(error) = &self.load_error {
            status = status.push(
                text(error.as_str())
                    .size(14)
                    .color(Color::from_rgb(0.8, 0.2, 0.2)),
            );
        }

        let mut body: Column<'_, Message> = Column::new().spacing(18).width(Length::Fill);
        for paragraph in &frame.paragraphs {
            body = body.push(self.paragraph_view(paragraph));
        }

        let indicators = frame
            .indicators
            .iter()
            .filter(|(_, state)| state.visible)
            .fold(Column::<Message>::new().spacing(4), |col, (kind, state)| {
                col.push(self.indicator_view(*kind, state.text(*kind)))
            });
        body = body.push(indicators);

        let lesson_view = scrollable(
            container(body)
                .width(Length::Fill)
                .padding([self.config.margin_vertical, self.config.margin_horizontal]),
        )
        .height(Length::Fill);

        column![controls, status, lesson_view]
            .padding(16)
            .spacing(12)
            .height(Length::Fill)
            .into()
    }

    fn paragraph_view<'a>(&self, paragraph: &ParagraphFrame<'a>) -> Element<'a, Message> {
        let color = matches!(paragraph.kind, ParagraphKind::Feedback).then_some(FEEDBACK_COLOR);

        let lines = paragraph
            .segments
            .iter()
            .zip(paragraph.revealed.iter())
            .filter(|(_, revealed)| **revealed > 0)
            .fold(Column::<Message>::new().spacing(6), |col, (segment, revealed)| {
                col.push(self.segment_view(segment, *revealed, color))
            });

        lines.width(Length::Fill).into()
    }

    fn segment_view<'a>(
        &self,
        segment: &Segment,
        revealed: usize,
        color: Option<Color>,
    ) -> Element<'a, Message> {
        let size = self.config.font_size as f32;
        let line_height = LineHeight::Relative(self.config.line_spacing);

        let spans: Vec<Span<'a, Message>> = visible_fragments(segment, revealed)
            .into_iter()
            .map(|fragment| {
                let font = if fragment.is_bold {
                    Font {
                        weight: Weight::Bold,
                        ..Font::DEFAULT
                    }
                } else {
                    Font::DEFAULT
                };
                let span = Span::new(fragment.text)
                    .font(font)
                    .size(size)
                    .line_height(line_height);
                match color {
                    Some(color) => span.color(color),
                    None => span,
                }
            })
            .collect();

        let align = if segment.is_centered {
            Horizontal::Center
        } else {
            Horizontal::Left
        };

        let rich: Rich<'a, Message> = Rich::with_spans(spans);
        rich.width(Length::Fill)
            .wrapping(Wrapping::WordOrGlyph)
            .align_x(align)
            .into()
    }

    fn indicator_view<'a>(&self, kind: IndicatorKind, label: String) -> Element<'a, Message> {
        let color = match kind {
            IndicatorKind::Saving => FEEDBACK_COLOR,
            IndicatorKind::Waiting | IndicatorKind::Analyzing => Color::from_rgb(0.45, 0.45, 0.5),
        };
        text(label)
            .size(self.config.font_size as f32 * 0.8)
            .font(Font {
                style: Style::Italic,
                ..Font::DEFAULT
            })
            .color(color)
            .into()
    }

    fn progress_label(&self) -> String {
        match self.progress.completed_runs {
            0 => "Not completed yet".to_string(),
            1 => "Completed once".to_string(),
            runs => format!("Completed {runs} times"),
        }
    }
}
