//! Deck configuration.
//!
//! Static slide content (cover, overview fallback, synthesis and conclusion
//! slides) and the numeric limits of both assembly policies. Every field has
//! a default, so a config file only needs to name what it overrides.

use crate::error::{Error, Result};
use crate::paginate::ContinuationStyle;
use crate::types::{Slide, SlideKind};
use serde::{Deserialize, Serialize};

/// Content for a slide that does not come from the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticSlide {
    pub title: String,
    pub subtitle: Option<String>,
    pub bullets: Vec<String>,
}

impl StaticSlide {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, bullets: &[&str]) -> Self {
        Self {
            title: title.into(),
            subtitle: Some(subtitle.into()),
            bullets: bullets.iter().map(|b| b.to_string()).collect(),
        }
    }

    /// Build a slide record of the given kind from this content.
    pub fn to_slide(&self, kind: SlideKind) -> Slide {
        Slide {
            kind,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            bullets: self.bullets.clone(),
        }
    }
}

/// The bounded policy's goals/audience slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    pub title: String,
    pub subtitle: Option<String>,
    /// How many of the first section's intro bullets to show.
    pub max_bullets: usize,
    /// Bullets used when the first section has no intro.
    pub fallback_bullets: Vec<String>,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            title: "报告目标与受众".to_string(),
            subtitle: Some("项目概况".to_string()),
            max_bullets: 4,
            fallback_bullets: vec![
                "阐释人工智能技术发展背景与战略价值".to_string(),
                "明确报告面向的核心受众与痛点".to_string(),
                "通过结构化大纲帮助快速建立认知".to_string(),
            ],
        }
    }
}

/// Limits for the unbounded, content-driven policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnboundedOptions {
    /// Bullets per content slide.
    pub chunk_size: usize,
    /// Section titles per agenda slide.
    pub agenda_chunk_size: usize,
    /// Bullets consolidated per section intro or subsection.
    pub max_bullets_per_group: usize,
    #[serde(with = "continuation_style")]
    pub continuation: ContinuationStyle,
}

impl Default for UnboundedOptions {
    fn default() -> Self {
        Self {
            chunk_size: 8,
            agenda_chunk_size: 9,
            max_bullets_per_group: 24,
            continuation: ContinuationStyle::Fraction,
        }
    }
}

/// Limits for the bounded, exact-length policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundedOptions {
    /// Total number of slides in the deck.
    pub target_slides: usize,
    /// Subsection slides per section.
    pub max_subsection_slides: usize,
    /// Bullets on a section intro slide.
    pub intro_bullets: usize,
    /// Bullets on a subsection slide.
    pub bullets_per_slide: usize,
}

impl Default for BoundedOptions {
    fn default() -> Self {
        Self {
            target_slides: 50,
            max_subsection_slides: 5,
            intro_bullets: 5,
            bullets_per_slide: 6,
        }
    }
}

/// Full deck configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Cover content; the document title and subtitle take precedence.
    pub cover: StaticSlide,
    pub overview: OverviewConfig,
    /// Agenda title under the unbounded policy.
    pub agenda_title: String,
    /// Agenda title under the bounded policy.
    pub bounded_agenda_title: String,
    /// Supplementary slides appended when a bounded deck runs short.
    pub synthesis: Vec<StaticSlide>,
    pub conclusion: StaticSlide,
    pub unbounded: UnboundedOptions,
    pub bounded: BoundedOptions,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            cover: StaticSlide::new(
                "AI技术核心解析报告",
                "AI 深度研究报告",
                &[
                    "聚焦算力、模型、部署、生态四大维度",
                    "服务体制内高层领导与技术团队决策",
                    "提供战略认知框架与落地实施路径",
                ],
            ),
            overview: OverviewConfig::default(),
            agenda_title: "目录".to_string(),
            bounded_agenda_title: "目录总览".to_string(),
            synthesis: default_synthesis(),
            conclusion: StaticSlide::new(
                "战略收束与下一步行动",
                "Action Items",
                &[
                    "制定算力与数据双轮驱动计划，构建自主可控的AI底座",
                    "围绕重点场景推进大模型试点，形成可复制的行业解决方案",
                    "建立跨部门AI治理委员会，完善安全、伦理与评估机制",
                    "加大人才培养与生态合作力度，打造持续创新的组织能力",
                    "设定季度性里程碑与指标，确保战略执行落地可衡量",
                ],
            ),
            unbounded: UnboundedOptions::default(),
            bounded: BoundedOptions::default(),
        }
    }
}

fn default_synthesis() -> Vec<StaticSlide> {
    vec![
        StaticSlide::new(
            "算力基础设施战略要点",
            "综合洞察",
            &[
                "将GPU算力视为AI产业底座，提前布局数据中心与网络设施",
                "建立面向模型开发的统一算力调度平台，提高资源利用率",
                "强化软硬件协同优化，围绕CUDA生态构建自主研发能力",
                "通过多元合作保障芯片供应链安全，规避地缘政治风险",
            ],
        ),
        StaticSlide::new(
            "大模型应用落地关键举措",
            "综合洞察",
            &[
                "分层规划模型能力：基础模型、自主训练、行业微调协同推进",
                "搭建数据治理体系，确保数据高质量、可追溯与合规",
                "建立模型评测指标体系，覆盖效果、安全、效率与可维护性",
                "通过知识蒸馏、模型压缩与部署优化提升推理效率",
            ],
        ),
        StaticSlide::new(
            "智能体与知识体系构建方向",
            "综合洞察",
            &[
                "围绕业务流程设计多Agent协同架构，实现任务自动化",
                "建设持续演进的企业知识库，支持模型检索增强",
                "制定安全与伦理规范，确保智能体行为可控",
                "构建跨部门协同机制，加速AI应用迭代与复盘",
            ],
        ),
    ]
}

impl DeckConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bounded deck length.
    pub fn with_target_slides(mut self, target: usize) -> Self {
        self.bounded.target_slides = target;
        self
    }

    /// Set the bullets per content slide for the unbounded policy.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.unbounded.chunk_size = chunk_size;
        self
    }

    /// Replace the synthesis slides.
    pub fn with_synthesis(mut self, synthesis: Vec<StaticSlide>) -> Self {
        self.synthesis = synthesis;
        self
    }

    /// Check that every limit is usable and every static slide has a title.
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("unbounded.chunk_size", self.unbounded.chunk_size),
            ("unbounded.agenda_chunk_size", self.unbounded.agenda_chunk_size),
            ("unbounded.max_bullets_per_group", self.unbounded.max_bullets_per_group),
            ("bounded.bullets_per_slide", self.bounded.bullets_per_slide),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be at least 1")));
            }
        }

        let titles = [
            ("cover.title", self.cover.title.as_str()),
            ("overview.title", self.overview.title.as_str()),
            ("agenda_title", self.agenda_title.as_str()),
            ("bounded_agenda_title", self.bounded_agenda_title.as_str()),
            ("conclusion.title", self.conclusion.title.as_str()),
        ];
        for (name, title) in titles {
            if title.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{name} must not be empty")));
            }
        }

        if let Some(idx) = self.synthesis.iter().position(|s| s.title.trim().is_empty()) {
            return Err(Error::InvalidConfig(format!("synthesis[{idx}].title must not be empty")));
        }
        Ok(())
    }
}

/// Serde support for [`ContinuationStyle`] as `"fraction"` / `"continued"`.
mod continuation_style {
    use crate::paginate::ContinuationStyle;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(style: &ContinuationStyle, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match style {
            ContinuationStyle::Fraction => "fraction",
            ContinuationStyle::Continued => "continued",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ContinuationStyle, D::Error> {
        let value = String::deserialize(deserializer)?;
        match value.as_str() {
            "fraction" => Ok(ContinuationStyle::Fraction),
            "continued" => Ok(ContinuationStyle::Continued),
            other => Err(serde::de::Error::unknown_variant(other, &["fraction", "continued"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DeckConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bounded.target_slides, 50);
        assert_eq!(config.synthesis.len(), 3);
        assert_eq!(config.unbounded.continuation, ContinuationStyle::Fraction);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "agenda_title": "Agenda",
            "bounded": { "target_slides": 12 },
            "unbounded": { "continuation": "continued" },
            "synthesis": []
        }"#;
        let config: DeckConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.agenda_title, "Agenda");
        assert_eq!(config.bounded.target_slides, 12);
        assert_eq!(config.bounded.bullets_per_slide, 6);
        assert_eq!(config.unbounded.continuation, ContinuationStyle::Continued);
        assert_eq!(config.unbounded.chunk_size, 8);
        assert!(config.synthesis.is_empty());
        assert_eq!(config.conclusion.title, "战略收束与下一步行动");
    }

    #[test]
    fn test_unknown_continuation_rejected() {
        let json = r#"{ "unbounded": { "continuation": "sideways" } }"#;
        assert!(serde_json::from_str::<DeckConfig>(json).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = DeckConfig::default().with_chunk_size(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_empty_titles() {
        let json_cases = [
            r#"{ "agenda_title": "" }"#,
            r#"{ "bounded_agenda_title": "  " }"#,
            r#"{ "overview": { "title": "" } }"#,
            r#"{ "synthesis": [ { "title": "要点", "bullets": ["a"] }, { "title": "" } ] }"#,
            r#"{ "cover": { "title": "" } }"#,
        ];

        for json in json_cases {
            let config: DeckConfig = serde_json::from_str(json).unwrap();
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfig(_))),
                "accepted {json}"
            );
        }
    }

    #[test]
    fn test_validate_names_bad_synthesis_slide() {
        let config = DeckConfig::default().with_synthesis(vec![StaticSlide::default()]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("synthesis[0].title"));
    }

    #[test]
    fn test_static_slide_to_slide() {
        let slide = StaticSlide::new("T", "S", &["a", "b"]).to_slide(SlideKind::Summary);
        assert_eq!(slide.kind, SlideKind::Summary);
        assert_eq!(slide.subtitle.as_deref(), Some("S"));
        assert_eq!(slide.bullets, vec!["a", "b"]);
    }
}
