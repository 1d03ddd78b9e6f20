//! Opportunity portfolio and stakeholder matching

use crate::graph::{ActorNode, OntologyGraph};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    pub id: &'static str,
    pub category: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cities: &'static [&'static str],
    pub segment: &'static str,
    pub impact: &'static str,
    pub viability: &'static str,
    /// 1 to 5
    pub impact_value: u8,
    /// 1 to 5
    pub viability_value: u8,
    /// impact x viability
    pub priority: u8,
    pub horizon: &'static str,
    pub estimated_investment: &'static str,
    pub recommended_stakeholders: &'static [&'static str],
}

const ALL_CITIES: &[&str] = &["Santa Cruz do Capibaribe", "Caruaru", "Toritama"];

const PORTFOLIO: [Opportunity; 6] = [
    Opportunity {
        id: "opp_001",
        category: "Transformação Digital",
        name: "Plataforma Digital Escalonada",
        description: "Implementação de plataforma digital com níveis progressivos para inclusão de pequenos produtores",
        cities: ALL_CITIES,
        segment: "Geral",
        impact: "Alto",
        viability: "Média",
        impact_value: 4,
        viability_value: 3,
        priority: 12,
        horizon: "Curto prazo (1-2 anos)",
        estimated_investment: "R$ 5-10 milhões",
        recommended_stakeholders: &["Bruno Bezerra", "Cláuston Pacas Silva", "Valmir Ribeiro"],
    },
    Opportunity {
        id: "opp_002",
        category: "Sustentabilidade",
        name: "Consórcio de Tratamento de Efluentes",
        description: "Sistema compartilhado para tratamento de efluentes das lavanderias de Toritama",
        cities: &["Toritama"],
        segment: "Lavanderias",
        impact: "Muito Alto",
        viability: "Média",
        impact_value: 5,
        viability_value: 3,
        priority: 15,
        horizon: "Médio prazo (3-5 anos)",
        estimated_investment: "R$ 8-12 milhões",
        recommended_stakeholders: &["Douglas Costa", "Sídia Haiut", "Raquel Lyra"],
    },
    Opportunity {
        id: "opp_003",
        category: "Educação e Capacitação",
        name: "Centro de Excelência em Design",
        description: "Centro integrado de formação em design e moda para agregação de valor",
        cities: &["Caruaru"],
        segment: "Design e Moda",
        impact: "Alto",
        viability: "Alta",
        impact_value: 4,
        viability_value: 4,
        priority: 16,
        horizon: "Médio prazo (3-5 anos)",
        estimated_investment: "R$ 15-25 milhões",
        recommended_stakeholders: &["Newton Montenegro", "Ivania Porto", "Fernando Pimentel"],
    },
    Opportunity {
        id: "opp_004",
        category: "Economia Circular",
        name: "Sistema de Reaproveitamento de Resíduos",
        description: "Implementação de economia circular para retalhos e sobras têxteis",
        cities: &["Santa Cruz do Capibaribe", "Caruaru"],
        segment: "Produção",
        impact: "Alto",
        viability: "Média",
        impact_value: 4,
        viability_value: 3,
        priority: 12,
        horizon: "Médio prazo (3-5 anos)",
        estimated_investment: "R$ 3-8 milhões",
        recommended_stakeholders: &["José Gomes Filho", "Gilson Belarmino", "Ricardo Cappelli"],
    },
    Opportunity {
        id: "opp_005",
        category: "Empreendedorismo Feminino",
        name: "Programa de Microcrédito para Mulheres",
        description: "Linha específica de microcrédito e capacitação para empreendedoras do setor",
        cities: ALL_CITIES,
        segment: "Facções",
        impact: "Alto",
        viability: "Alta",
        impact_value: 4,
        viability_value: 4,
        priority: 16,
        horizon: "Curto prazo (1-2 anos)",
        estimated_investment: "R$ 10-20 milhões",
        recommended_stakeholders: &[
            "Ivania Porto",
            "Danielle Lago Bruno de Faria",
            "Shirley Kelly Monteiro Torres Oliveira",
        ],
    },
    Opportunity {
        id: "opp_006",
        category: "Inovação Tecnológica",
        name: "Tecnologias de Baixo Consumo Hídrico",
        description: "Desenvolvimento e adoção de tecnologias para redução do consumo de água",
        cities: &["Toritama"],
        segment: "Lavanderias",
        impact: "Muito Alto",
        viability: "Baixa",
        impact_value: 5,
        viability_value: 2,
        priority: 10,
        horizon: "Longo prazo (mais de 5 anos)",
        estimated_investment: "R$ 20-40 milhões",
        recommended_stakeholders: &["Ricardo Cappelli", "Fernando Pimentel", "Mario Cezar de Aguiar"],
    },
];

pub fn opportunity_portfolio() -> &'static [Opportunity] {
    &PORTFOLIO
}

impl Opportunity {
    /// Recommended stakeholders resolved against the ontology by exact name
    pub fn resolve_stakeholders<'g>(&self, graph: &'g OntologyGraph) -> Vec<(&'static str, Option<&'g ActorNode>)> {
        self.recommended_stakeholders
            .iter()
            .map(|name| (*name, graph.actors().find(|a| a.name == *name)))
            .collect()
    }

    /// Why a stakeholder fits this opportunity
    pub fn justification(&self, actor: &ActorNode) -> String {
        let category = self.category.to_lowercase();
        let area = actor.display_attribute("activity_area").unwrap_or_default().to_lowercase();
        let leadership = actor.display_attribute("leadership_type").unwrap_or_default();
        let mut reasons = Vec::new();

        if category.contains("digital") && area.contains("digital") {
            reasons.push("expertise em transformação digital".to_string());
        }
        if let Some(city) = actor.city() {
            if self.cities.iter().any(|c| *c == city) {
                reasons.push(format!("atuação em {}", city));
            }
        }
        if leadership.contains("Governamental") && category.contains("sustentabilidade") {
            reasons.push("capacidade de articulação de políticas públicas".to_string());
        } else if leadership.contains("Empresarial") && category.contains("empreendedorismo") {
            reasons.push("experiência em desenvolvimento empresarial".to_string());
        } else if leadership.contains("Associativa") {
            reasons.push("capacidade de mobilização setorial".to_string());
        }
        if actor.relevance().is_some_and(|r| r >= 8.0) {
            reasons.push("alta relevância no ecossistema".to_string());
        }

        if reasons.is_empty() {
            "expertise relevante para a oportunidade".to_string()
        } else {
            reasons.join(", ")
        }
    }

    pub fn next_steps(&self) -> [&'static str; 5] {
        if self.category.contains("Digital") {
            [
                "Realizar workshop de alinhamento com stakeholders-chave",
                "Mapear necessidades específicas dos usuários finais",
                "Desenvolver protótipo funcional mínimo",
                "Estabelecer cronograma de implementação faseada",
                "Definir métricas de sucesso e monitoramento",
            ]
        } else if self.category.contains("Sustentabilidade") {
            [
                "Realizar estudo de viabilidade técnica e ambiental",
                "Articular parcerias público-privadas",
                "Desenvolver modelo de governança compartilhada",
                "Estabelecer marcos regulatórios necessários",
                "Criar plano de financiamento sustentável",
            ]
        } else if self.category.contains("Educação") {
            [
                "Mapear demandas de capacitação no setor",
                "Desenvolver currículo adaptado às necessidades locais",
                "Estabelecer parcerias com instituições de ensino",
                "Criar programa piloto de formação",
                "Definir sistema de certificação e reconhecimento",
            ]
        } else if self.category.contains("Empreendedorismo") {
            [
                "Realizar diagnóstico das necessidades das empreendedoras",
                "Desenvolver produtos financeiros específicos",
                "Criar programa de mentoria e acompanhamento",
                "Estabelecer rede de apoio e suporte",
                "Definir indicadores de impacto social",
            ]
        } else {
            [
                "Realizar reunião de alinhamento inicial",
                "Desenvolver plano detalhado de implementação",
                "Identificar recursos e fontes de financiamento",
                "Estabelecer cronograma e marcos de entrega",
                "Definir governança e responsabilidades",
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::load_ontology_value;
    use serde_json::json;

    #[test]
    fn test_priority_is_impact_times_viability() {
        for opp in opportunity_portfolio() {
            assert_eq!(opp.priority, opp.impact_value * opp.viability_value, "{}", opp.id);
        }
    }

    #[test]
    fn test_resolve_and_justify() {
        let graph = load_ontology_value(
            &json!({
                "nodes": [{"id": "p1", "name": "Raquel Lyra",
                           "attributes": {"main_city": "Toritama", "leadership_type": "Governamental",
                                          "relevance_degree": 9}}],
                "edges": []
            }),
            None,
        )
        .unwrap();
        let opp = &opportunity_portfolio()[1];
        let resolved = opp.resolve_stakeholders(&graph);
        assert_eq!(resolved.len(), 3);
        let actor = resolved[2].1.unwrap();
        assert!(resolved[0].1.is_none());
        assert_eq!(
            opp.justification(actor),
            "atuação em Toritama, capacidade de articulação de políticas públicas, alta relevância no ecossistema"
        );
    }
}
