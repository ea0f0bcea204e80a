//! 单页 PDF 成绩单
//!
//! 使用 PDF 内置的 Helvetica 字体，不嵌入字体文件；
//! 内置字体只覆盖 Latin-1，其余字符输出为 `?`。

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use super::report::ReportCard;
use crate::errors::Result;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const LINE_HEIGHT: f32 = 5.5;
// 10pt Helvetica 在可用宽度内大约能放下的字符数
const WRAP_CHARS: usize = 95;

/// 逐行写入，超出页面底部后丢弃剩余内容
struct PageWriter {
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    truncated: bool,
}

impl PageWriter {
    // 底部保留一行给截断提示
    fn has_room(&self) -> bool {
        self.y - 2.0 * LINE_HEIGHT >= MARGIN
    }

    fn line(&mut self, text: &str, size: f32, bold: bool) {
        if !self.has_room() {
            self.truncated = true;
            return;
        }
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(latin1(text), size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT * (size / 10.0).max(1.0);
    }

    fn footer(&self, text: &str) {
        self.layer
            .use_text(latin1(text), 8.0, Mm(MARGIN), Mm(MARGIN), &self.regular);
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT / 2.0;
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap(text, WRAP_CHARS) {
            self.line(&line, 10.0, false);
        }
    }
}

/// 内置字体无法显示的字符替换为 `?`
fn latin1(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='\u{ff}').contains(&c) { c } else { '?' })
        .collect()
}

/// 按单词折行，超长单词硬切
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub(crate) fn render_report_card(card: &ReportCard) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Report Card",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Report",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut writer = PageWriter {
        layer: doc.get_page(page).get_layer(layer),
        regular,
        bold,
        y: PAGE_HEIGHT - MARGIN,
        truncated: false,
    };

    writer.line("Report Card", 16.0, true);
    writer.line(&card.heading(), 11.0, false);
    writer.line(&card.classroom_label(), 10.0, false);
    writer.gap();

    writer.line("Scores", 12.0, true);
    if card.summaries.is_empty() {
        writer.line("No scores recorded.", 10.0, false);
    }
    for (subject, s) in &card.summaries {
        writer.line(
            &format!(
                "{subject}: total {:.2}, rank {}/{}, band {}, level {} (avg {:.2}, sd {:.2})",
                s.total_score,
                s.rank,
                s.student_count,
                s.grade_band,
                s.achievement_level,
                s.subject_average,
                s.standard_deviation
            ),
            10.0,
            false,
        );
    }
    writer.gap();

    let a = &card.attendance;
    writer.line("Attendance", 12.0, true);
    writer.line(
        &format!(
            "Absence {}, tardy {}, early leave {}, skipped {} (total {})",
            a.by_type.absence, a.by_type.tardy, a.by_type.early_leave, a.by_type.skipped, a.total
        ),
        10.0,
        false,
    );
    writer.line(
        &format!(
            "Illness {}, authorized {}, unauthorized {}, other {}",
            a.by_reason.illness, a.by_reason.authorized, a.by_reason.unauthorized, a.by_reason.other
        ),
        10.0,
        false,
    );
    writer.gap();

    writer.line("Behavior", 12.0, true);
    if card.behaviors.is_empty() {
        writer.line("No notes recorded.", 10.0, false);
    }
    for behavior in &card.behaviors {
        writer.paragraph(&behavior.content);
        writer.gap();
    }

    if writer.truncated {
        writer.footer("(truncated, see the xlsx report for full details)");
    }

    Ok(doc.save_to_bytes()?)
}
