//! Methodology page: the AIM framework document, embedded as-is

use super::{Page, PageId, PageView, Section};
use crate::data::Dataset;
use crate::notice::Notice;
use crate::session::SessionContext;

pub struct MethodologyPage;

impl Page for MethodologyPage {
    fn render(&self, _ctx: &mut SessionContext, data: &Dataset) -> PageView {
        let mut view = PageView::new(PageId::Methodology);
        match &data.methodology {
            Some(html) if !html.trim().is_empty() => view.push(Section::Html { html: html.clone() }),
            _ => view.notice(Notice::warning("Página indisponível")),
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;

    #[test]
    fn test_missing_document_is_unavailable() {
        let mut ctx = SessionContext::new("s");
        let view = MethodologyPage.render(&mut ctx, &Dataset::placeholder());
        assert!(view.sections.is_empty());
        assert_eq!(view.notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_document_is_embedded() {
        let mut data = Dataset::placeholder();
        data.methodology = Some("<h1>AIM</h1>".to_string());
        let view = MethodologyPage.render(&mut SessionContext::new("s"), &data);
        assert_eq!(view.sections, vec![Section::Html { html: "<h1>AIM</h1>".to_string() }]);
    }
}
