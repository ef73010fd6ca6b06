use crate::error::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 题目类型（1..=5）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuestionType {
    /// 干员调配与特性化决策
    OperatorDeployment = 1,
    /// 空间部署与极致化战术
    SpatialTactics = 2,
    /// 效能审计与生态位界定
    EfficiencyAudit = 3,
    /// 横向分析与竞争力评估
    CompetitiveAnalysis = 4,
    /// 作战环境与档案类记录
    CombatArchives = 5,
}

impl QuestionType {
    pub const ALL: [QuestionType; 5] = [
        QuestionType::OperatorDeployment,
        QuestionType::SpatialTactics,
        QuestionType::EfficiencyAudit,
        QuestionType::CompetitiveAnalysis,
        QuestionType::CombatArchives,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            QuestionType::OperatorDeployment => "干员调配与特性化决策",
            QuestionType::SpatialTactics => "空间部署与极致化战术",
            QuestionType::EfficiencyAudit => "效能审计与生态位界定",
            QuestionType::CompetitiveAnalysis => "横向分析与竞争力评估",
            QuestionType::CombatArchives => "作战环境与档案类记录",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(QuestionType::OperatorDeployment),
            2 => Some(QuestionType::SpatialTactics),
            3 => Some(QuestionType::EfficiencyAudit),
            4 => Some(QuestionType::CompetitiveAnalysis),
            5 => Some(QuestionType::CombatArchives),
            _ => None,
        }
    }
}

/// 题目难度（1..=5）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    /// 常识
    Common = 1,
    /// 基操
    Basic = 2,
    /// 娴熟
    Skilled = 3,
    /// 明智
    Wise = 4,
    /// 深邃
    Profound = 5,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Common,
        Difficulty::Basic,
        Difficulty::Skilled,
        Difficulty::Wise,
        Difficulty::Profound,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Common => "常识",
            Difficulty::Basic => "基操",
            Difficulty::Skilled => "娴熟",
            Difficulty::Wise => "明智",
            Difficulty::Profound => "深邃",
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Difficulty::Common),
            2 => Some(Difficulty::Basic),
            3 => Some(Difficulty::Skilled),
            4 => Some(Difficulty::Wise),
            5 => Some(Difficulty::Profound),
            _ => None,
        }
    }
}

/// 类型文案，未知类型返回 "未知类型"
pub fn type_text(code: u8) -> &'static str {
    QuestionType::from_code(code).map_or("未知类型", QuestionType::name)
}

/// 难度文案，未知难度返回 "未知难度"
pub fn difficulty_text(code: u8) -> &'static str {
    Difficulty::from_code(code).map_or("未知难度", Difficulty::name)
}

/// 题目（题库与入职培训共用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default)]
    pub difficulty: u8,
    /// 题干
    #[serde(rename = "question", default)]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// 正确选项（1..=4）
    #[serde(rename = "answer", default)]
    pub correct_option: u8,
    /// 解析
    #[serde(rename = "analysis", default)]
    pub explanation: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default)]
    pub picture: bool,
}

impl Question {
    pub fn is_correct(&self, selected: u8) -> bool {
        selected == self.correct_option
    }

    pub fn question_type(&self) -> Option<QuestionType> {
        QuestionType::from_code(self.kind)
    }

    /// 关键字是否命中题干、选项、关键词或解析（不区分大小写）
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return false;
        }
        self.prompt.to_lowercase().contains(&keyword)
            || self.options.iter().any(|o| o.to_lowercase().contains(&keyword))
            || self.keywords.iter().any(|k| k.to_lowercase().contains(&keyword))
            || self.explanation.to_lowercase().contains(&keyword)
    }

    /// 转成界面展示用的格式
    ///
    /// 换行转 `<br>`；培训题目显示固定的类型与难度文案。
    pub fn to_display(&self, training: bool) -> DisplayQuestion {
        let mut options: Vec<String> = self.options.iter().map(|o| newline_to_br(o)).collect();
        if options.is_empty() {
            options = vec![String::new(); 4];
        }
        DisplayQuestion {
            id: self.id,
            type_text: if training { "入职培训" } else { type_text(self.kind) }.to_string(),
            difficulty_text: if training { "入门" } else { difficulty_text(self.difficulty) }
                .to_string(),
            prompt: newline_to_br(&self.prompt),
            options,
            explanation: newline_to_br(&self.explanation),
            keywords: self.keywords.clone(),
            resource: self.resource.clone().unwrap_or_default(),
            picture: self.picture,
        }
    }
}

/// 界面展示用题目
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayQuestion {
    pub id: u32,
    pub type_text: String,
    pub difficulty_text: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub explanation: String,
    pub keywords: Vec<String>,
    pub resource: String,
    pub picture: bool,
}

/// 新建/编辑题目的提交数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "answer")]
    pub correct_option: u8,
    #[serde(rename = "type")]
    pub kind: u8,
    pub difficulty: u8,
    #[serde(rename = "analysis", default)]
    pub explanation: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

impl QuestionDraft {
    /// 提交前的快速校验，返回全部错误而不是第一条
    ///
    /// 后端才是最终校验方，这里只为了更快的界面反馈。
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.prompt.trim().is_empty() {
            errors.push("题目内容不能为空".to_string());
        }

        if self.options.len() != 4 {
            errors.push("需要提供4个选项".to_string());
        } else {
            for (index, option) in self.options.iter().enumerate() {
                if option.trim().is_empty() {
                    let label = char::from(b'A' + (index % 26) as u8);
                    errors.push(format!("选项{}不能为空", label));
                }
            }
        }

        if !(1..=4).contains(&self.correct_option) {
            errors.push("正确答案必须在1-4之间".to_string());
        }

        if QuestionType::from_code(self.kind).is_none() {
            errors.push("题目类型必须在1-5之间".to_string());
        }

        if Difficulty::from_code(self.difficulty).is_none() {
            errors.push("题目难度必须在1-5之间".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(errors))
        }
    }

    /// 编辑器里的 `<br>` 还原为换行
    pub fn normalized_for_submit(mut self) -> Self {
        self.prompt = br_to_newline(&self.prompt);
        self.options = self.options.iter().map(|o| br_to_newline(o)).collect();
        self.explanation = br_to_newline(&self.explanation);
        self
    }
}

impl From<&Question> for QuestionDraft {
    fn from(q: &Question) -> Self {
        Self {
            prompt: q.prompt.clone(),
            options: q.options.clone(),
            correct_option: q.correct_option,
            kind: q.kind,
            difficulty: q.difficulty,
            explanation: q.explanation.clone(),
            keywords: q.keywords.clone(),
            resource: q.resource.clone(),
        }
    }
}

/// 题目列表查询参数（未设置的字段不覆盖默认值）
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_analysis: Option<bool>,
}

impl QuestionQuery {
    pub fn page(page: u32, size: u32) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
            ..Default::default()
        }
    }
}

/// 单题统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionStats {
    pub total_attempts: u64,
    pub correct_rate: f64,
    pub most_common_wrong_option: Option<u8>,
}

fn br_regex() -> Option<&'static Regex> {
    static BR: OnceLock<Option<Regex>> = OnceLock::new();
    BR.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").ok()).as_ref()
}

fn tag_regex() -> Option<&'static Regex> {
    static TAG: OnceLock<Option<Regex>> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").ok()).as_ref()
}

pub fn newline_to_br(text: &str) -> String {
    text.replace("\r\n", "<br>").replace('\n', "<br>")
}

pub fn br_to_newline(text: &str) -> String {
    match br_regex() {
        Some(re) => re.replace_all(text, "\n").into_owned(),
        None => text.replace("<br>", "\n"),
    }
}

/// 列表里显示的题干摘要：去掉标签，超过 120 字截断
pub fn truncate_prompt(prompt: &str) -> String {
    let mut plain = match br_regex() {
        Some(re) => re.replace_all(prompt, " ").into_owned(),
        None => prompt.to_string(),
    };
    if let Some(re) = tag_regex() {
        plain = re.replace_all(&plain, "").into_owned();
    }
    crate::utils::truncate_text(&plain, 120)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            prompt: "以下哪位干员适合先锋位？".to_string(),
            options: vec!["德克萨斯".into(), "能天使".into(), "闪灵".into(), "星熊".into()],
            correct_option: 1,
            kind: 1,
            difficulty: 2,
            ..Default::default()
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn validation_collects_every_error() {
        let mut d = draft();
        d.prompt = "   ".to_string();
        d.options[2] = String::new();
        d.correct_option = 5;
        d.kind = 0;
        d.difficulty = 6;

        match d.validate() {
            Err(ValidationError::Fields(errors)) => {
                assert_eq!(
                    errors,
                    vec![
                        "题目内容不能为空",
                        "选项C不能为空",
                        "正确答案必须在1-4之间",
                        "题目类型必须在1-5之间",
                        "题目难度必须在1-5之间",
                    ]
                );
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn too_few_options_is_reported_once() {
        let mut d = draft();
        d.options.truncate(3);
        let err = d.validate().unwrap_err();
        assert_eq!(err.to_string(), "需要提供4个选项");
    }

    #[test]
    fn five_options_are_rejected() {
        let mut d = draft();
        d.options.push("选项五".to_string());
        let err = d.validate().unwrap_err();
        assert_eq!(err.to_string(), "需要提供4个选项");
    }

    #[test]
    fn deserializes_backend_field_names() {
        let q: Question = serde_json::from_value(serde_json::json!({
            "id": 7,
            "type": 3,
            "difficulty": 4,
            "question": "第一行\n第二行",
            "options": ["A", "B", "C", "D"],
            "answer": 3,
            "analysis": "因为……",
            "keywords": ["审计"]
        }))
        .unwrap();

        assert_eq!(q.kind, 3);
        assert_eq!(q.correct_option, 3);
        assert!(q.is_correct(3));
        assert!(!q.is_correct(2));

        let display = q.to_display(false);
        assert_eq!(display.prompt, "第一行<br>第二行");
        assert_eq!(display.type_text, "效能审计与生态位界定");
        assert_eq!(display.difficulty_text, "明智");

        let training = q.to_display(true);
        assert_eq!(training.type_text, "入职培训");
        assert_eq!(training.difficulty_text, "入门");
    }

    #[test]
    fn br_round_trips_for_editor() {
        let d = QuestionDraft {
            prompt: "a<br>b<BR/>c".to_string(),
            ..draft()
        }
        .normalized_for_submit();
        assert_eq!(d.prompt, "a\nb\nc");
    }

    #[test]
    fn truncate_prompt_strips_markup() {
        assert_eq!(truncate_prompt("<b>源石</b><br>技艺"), "源石 技艺");
    }
}
