//! Card demo: methodology phase cards with comment threads

use super::{Card, Page, PageId, PageView, Section};
use crate::data::Dataset;
use crate::session::SessionContext;

type Groups = &'static [(&'static str, &'static [&'static str])];

const PHASE_COLORS: [&str; 7] = ["#e53e3e", "#dd6b20", "#d69e2e", "#38a169", "#3182ce", "#805ad5", "#d53f8c"];

const PHASE_ONE: Groups = &[
    (
        "🎯 Entrada via CDL Regional",
        &[
            "Workshop alinhamento CDL (2 dias)",
            "Identificação 5-7 empresários-chave",
            "Protocolo apresentação pesquisa",
        ],
    ),
    (
        "🗺️ Mapeamento Contextual",
        &[
            "Entrevistas agentes indicados (1h30)",
            "Análise infraestrutura figital",
            "Redes sociais/organizacionais",
        ],
    ),
    (
        "📊 Objetivos SMART-er",
        &["20-30 insights validados", "15-20 agentes-chave engajados", "12 meses de cronograma"],
    ),
];

const PHASE_TWO: Groups = &[
    (
        "🕸️ Modelo de Rede",
        &["Mapeamento relações agentes", "Fluxos informação/influência", "Gatekeepers e conectores"],
    ),
    (
        "💡 Modelo de Insights",
        &["Framework captura via workshops", "Sistema categorização temática", "Validação colaborativa"],
    ),
    (
        "🔬 Hipóteses Focadas",
        &[
            "H1: Workshops → insights acionáveis",
            "H2: Validação cruzada (+40% qualidade)",
            "H3: Co-criação (>70% endorsement)",
        ],
    ),
];

const CUSTOM_CARD_HTML: &str = "<h4>📋 Features</h4><ul>\
<li>Click comment button to open dialog</li>\
<li>Add your own comments via modal</li>\
<li>Comments stored in the remote table store</li>\
<li>Session-based authorship</li></ul>\
<h4>💡 Usage</h4><ul>\
<li>View card content directly</li>\
<li>Click \"💬 Comentar\" to open the comment dialog</li>\
<li>See existing comments in the dialog</li>\
<li>Comments persist across sessions</li></ul>";

const INSTRUCTIONS: &str = "### 📖 Como usar os cartões:\n\n\
1. **Visualizar conteúdo**: O cartão mostra o conteúdo principal diretamente\n\
2. **Abrir comentários**: Clique no botão \"💬 Comentar\" para abrir o diálogo\n\
3. **Ver comentários existentes**: O diálogo mostra os últimos 3 comentários para contexto\n\
4. **Adicionar comentário**: Digite na caixa de texto e clique em \"💾 Adicionar\"\n\
5. **Indicador de comentários**: O número no canto superior direito mostra quantos comentários existem";

/// Card for methodology phase `number` (1-based)
pub fn phase_card(number: usize, title: &str, groups: Groups) -> Card {
    Card {
        id: format!("phase-{}", number),
        title: title.to_string(),
        color: PHASE_COLORS
            .get(number.wrapping_sub(1))
            .copied()
            .unwrap_or("#3182ce")
            .to_string(),
        groups: groups
            .iter()
            .map(|(heading, items)| (heading.to_string(), items.iter().map(|i| i.to_string()).collect()))
            .collect(),
        html: None,
        comment_location: format!("card_phase_{}", number),
    }
}

pub struct CardDemoPage;

impl Page for CardDemoPage {
    fn render(&self, _ctx: &mut SessionContext, _data: &Dataset) -> PageView {
        let mut view = PageView::new(PageId::CardDemo);
        view.title = "🃏 Interactive Cards Demo".to_string();
        view.markdown("Demonstração dos cartões interativos com diálogo de comentários integrado ao armazenamento remoto.");

        view.push(Section::Cards {
            cards: vec![
                phase_card(1, "FASE 1: CONTEXTUALIZE & FRAME", PHASE_ONE),
                phase_card(2, "FASE 2: MODEL & HYPOTHESIZE", PHASE_TWO),
            ],
        });
        view.push(Section::Cards {
            cards: vec![Card {
                id: "custom_demo".to_string(),
                title: "🚀 Custom Card Demo".to_string(),
                color: "#9f7aea".to_string(),
                groups: Vec::new(),
                html: Some(CUSTOM_CARD_HTML.to_string()),
                comment_location: "custom_demo".to_string(),
            }],
        });
        view.markdown(INSTRUCTIONS);
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cards() {
        let card = phase_card(2, "FASE 2", PHASE_TWO);
        assert_eq!(card.comment_location, "card_phase_2");
        assert_eq!(card.color, "#dd6b20");
        assert_eq!(card.groups.len(), 3);
        assert_eq!(phase_card(9, "X", &[]).color, "#3182ce");
    }

    #[test]
    fn test_render_lists_three_cards() {
        let view = CardDemoPage.render(&mut SessionContext::new("s"), &Dataset::placeholder());
        let cards: usize = view
            .sections
            .iter()
            .map(|s| match s {
                Section::Cards { cards } => cards.len(),
                _ => 0,
            })
            .sum();
        assert_eq!(cards, 3);
    }
}
