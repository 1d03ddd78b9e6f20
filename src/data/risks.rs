//! Value-chain risk register

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskPriority {
    #[serde(rename = "Crítica")]
    Critical,
    #[serde(rename = "Significativa")]
    Significant,
    #[serde(rename = "Moderada")]
    Moderate,
}

impl RiskPriority {
    pub const ALL: [RiskPriority; 3] = [RiskPriority::Critical, RiskPriority::Significant, RiskPriority::Moderate];

    pub fn label(&self) -> &'static str {
        match self {
            RiskPriority::Critical => "Crítica",
            RiskPriority::Significant => "Significativa",
            RiskPriority::Moderate => "Moderada",
        }
    }

    /// Marker color on the risk matrix
    pub fn color(&self) -> &'static str {
        match self {
            RiskPriority::Critical => "#FF4B4B",
            RiskPriority::Significant => "#FFA500",
            RiskPriority::Moderate => "#FFD700",
        }
    }
}

impl fmt::Display for RiskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Risk {
    pub category: &'static str,
    pub name: &'static str,
    /// 1 to 5
    pub severity: u8,
    /// 1 to 5
    pub probability: u8,
    pub priority: RiskPriority,
    pub description: &'static str,
    pub stakeholders: &'static str,
    pub mitigation: &'static str,
}

impl Risk {
    /// Severity x probability, 1 to 25
    pub fn value(&self) -> u8 {
        self.severity * self.probability
    }
}

const fn risk(
    category: &'static str,
    name: &'static str,
    severity: u8,
    probability: u8,
    priority: RiskPriority,
    description: &'static str,
    stakeholders: &'static str,
    mitigation: &'static str,
) -> Risk {
    Risk {
        category,
        name,
        severity,
        probability,
        priority,
        description,
        stakeholders,
        mitigation,
    }
}

use RiskPriority::{Critical, Moderate, Significant};

const REGISTER: [Risk; 20] = [
    risk("Social", "Trabalho infantil", 5, 5, Critical,
         "Utilização de mão de obra infantil nas facções e unidades produtivas",
         "Crianças e adolescentes, famílias, comunidade",
         "Fiscalização educativa, alternativas de renda, sensibilização"),
    risk("Social", "Precarização do trabalho", 5, 5, Critical,
         "Condições inadequadas de trabalho, jornadas excessivas, remuneração insuficiente",
         "Costureiras autônomas, trabalhadores informais",
         "Formalização gradual, melhoria de condições, fiscalização"),
    risk("Social", "Evasão escolar", 4, 5, Critical,
         "Abandono da educação formal em favor do trabalho precoce",
         "Jovens, comunidade, futuro do polo",
         "Educação dual, incentivos à permanência escolar"),
    risk("Econômico", "Concorrência com produtos importados", 5, 4, Critical,
         "Entrada massiva de produtos têxteis importados de baixo custo",
         "Todos os produtores, especialmente pequenas facções",
         "Inovação, diferenciação, agregação de valor"),
    risk("Econômico", "Dependência de intermediários", 4, 5, Critical,
         "Estrutura de mercado com múltiplos intermediários que capturam valor significativo",
         "Costureiras autônomas, facções, pequenos produtores",
         "Plataformas digitais, cooperação, vendas diretas"),
    risk("Ambiental", "Escassez hídrica", 5, 4, Critical,
         "Redução da disponibilidade de água para processos produtivos",
         "Lavanderias, produtores de jeans, comunidade",
         "Tecnologias de economia de água, reuso, captação de chuva"),
    risk("Ambiental", "Poluição de recursos hídricos", 5, 4, Critical,
         "Contaminação de rios e lençóis freáticos por efluentes não tratados",
         "Comunidade, meio ambiente, lavanderias",
         "Sistemas de tratamento, fiscalização, cooperação"),
    risk("Tecnológico", "Exclusão da transformação digital", 4, 5, Critical,
         "Incapacidade de pequenos produtores de acompanhar a digitalização",
         "Pequenos produtores, facções, comerciantes tradicionais",
         "Inclusão digital, capacitação, tecnologias acessíveis"),
    risk("Econômico", "Sazonalidade acentuada", 3, 4, Significant,
         "Concentração de vendas em períodos específicos",
         "Produtores e comerciantes",
         "Diversificação de mercados, planejamento estratégico"),
    risk("Econômico", "Limitações logísticas", 3, 4, Significant,
         "Infraestrutura de transporte deficiente, elevando custos",
         "Toda a cadeia, especialmente exportadores",
         "Investimento em infraestrutura, logística compartilhada"),
    risk("Econômico", "Acesso limitado a crédito", 3, 4, Significant,
         "Dificuldade de acesso a financiamento adequado",
         "Pequenos e médios produtores, empreendedores jovens",
         "Microcrédito, garantias coletivas, formalização"),
    risk("Social", "Desigualdade de gênero", 3, 4, Significant,
         "Disparidades de remuneração e oportunidades entre homens e mulheres",
         "Mulheres trabalhadoras, comunidade",
         "Programas de empoderamento feminino, capacitação"),
    risk("Social", "Problemas de saúde ocupacional", 3, 4, Significant,
         "Doenças e lesões relacionadas ao trabalho",
         "Trabalhadores, especialmente costureiras",
         "Equipamentos de segurança, ergonomia, prevenção"),
    risk("Ambiental", "Gestão inadequada de resíduos sólidos", 3, 4, Significant,
         "Descarte inadequado de retalhos, embalagens e outros resíduos",
         "Comunidade, meio ambiente, produtores",
         "Economia circular, reciclagem, reaproveitamento"),
    risk("Ambiental", "Uso de produtos químicos tóxicos", 3, 4, Significant,
         "Utilização de corantes, alvejantes e outros produtos nocivos",
         "Trabalhadores, comunidade, meio ambiente",
         "Produtos alternativos, capacitação, regulamentação"),
    risk("Tecnológico", "Resistência cultural à digitalização", 3, 4, Significant,
         "Rejeição de novas tecnologias e modelos de negócio digitais",
         "Produtores tradicionais, trabalhadores mais velhos",
         "Sensibilização, demonstrações práticas, capacitação gradual"),
    risk("Político", "Burocracia excessiva", 3, 4, Significant,
         "Processos complexos e demorados para licenciamentos",
         "Empreendedores, especialmente pequenos",
         "Simplificação de processos, balcão único, digitalização"),
    risk("Econômico", "Volatilidade de preços de insumos", 3, 3, Moderate,
         "Flutuações significativas nos preços de tecidos e aviamentos",
         "Toda a cadeia produtiva, especialmente pequenos produtores",
         "Compras coletivas, contratos de longo prazo, diversificação"),
    risk("Tecnológico", "Ciberataques e segurança digital", 4, 2, Moderate,
         "Vulnerabilidade a ataques cibernéticos em sistemas digitais",
         "Empresas digitalizadas, plataforma B2B",
         "Segurança digital, backups, treinamento em segurança"),
    risk("Político", "Descontinuidade de políticas públicas", 4, 3, Moderate,
         "Interrupção ou alteração significativa de programas governamentais",
         "Beneficiários de programas, instituições implementadoras",
         "Diversificação de fontes de apoio, sustentabilidade própria"),
];

/// The full register in document order
pub fn risk_register() -> &'static [Risk] {
    &REGISTER
}

/// Risk names on the city intensity heat map
pub const CITY_RISK_TYPES: [&str; 6] = [
    "Trabalho infantil",
    "Precarização do trabalho",
    "Evasão escolar",
    "Escassez hídrica",
    "Exclusão digital",
    "Dependência de intermediários",
];

/// Perceived intensity (0 to 5) of each `CITY_RISK_TYPES` entry per city
pub const CITY_RISK_INTENSITY: [(&str, [f64; 6]); 3] = [
    ("Santa Cruz do Capibaribe", [4.5, 4.2, 4.0, 3.5, 4.0, 4.5]),
    ("Caruaru", [3.0, 3.5, 3.2, 2.5, 3.0, 3.2]),
    ("Toritama", [5.0, 4.8, 4.5, 5.0, 4.5, 4.2]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_shape() {
        let register = risk_register();
        assert_eq!(register.len(), 20);
        assert!(register.iter().all(|r| (1..=5).contains(&r.severity) && (1..=5).contains(&r.probability)));
        assert_eq!(register.iter().filter(|r| r.priority == RiskPriority::Critical).count(), 8);
    }

    #[test]
    fn test_value_is_product() {
        let cyber = risk_register().iter().find(|r| r.name.starts_with("Ciberataques")).unwrap();
        assert_eq!(cyber.value(), 8);
    }

    #[test]
    fn test_priority_serializes_as_label() {
        assert_eq!(serde_json::to_value(RiskPriority::Critical).unwrap(), "Crítica");
    }
}
