use serde::Deserialize;
use ts_rs::TS;

/// 客户端提交的原始分数
///
/// 表单提交时分数常以字符串出现，两种形式都接受，
/// 由 [`ScoreInput::parse`] 统一转换。
#[derive(Debug, Clone, PartialEq, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum ScoreInput {
    Number(f64),
    Text(String),
}

impl ScoreInput {
    /// 解析为有限数值，无法解析时返回 None
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            ScoreInput::Number(v) => *v,
            ScoreInput::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for ScoreInput {
    fn from(value: f64) -> Self {
        ScoreInput::Number(value)
    }
}

impl From<&str> for ScoreInput {
    fn from(value: &str) -> Self {
        ScoreInput::Text(value.to_string())
    }
}

// 录入成绩请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateGradeRequest {
    pub student_id: i64,
    pub activity_id: i64,
    pub value: ScoreInput,
}

// 修改成绩请求，只允许改分数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRequest {
    pub value: ScoreInput,
}

// 成绩列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub subject_id: Option<i64>,
    pub activity_id: Option<i64>,
    pub student_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_input_parse() {
        assert_eq!(ScoreInput::from(7.5).parse(), Some(7.5));
        assert_eq!(ScoreInput::from(" 8 ").parse(), Some(8.0));
        assert_eq!(ScoreInput::from("abc").parse(), None);
        assert_eq!(ScoreInput::from("").parse(), None);
        assert_eq!(ScoreInput::from("NaN").parse(), None);
        assert_eq!(ScoreInput::from(f64::INFINITY).parse(), None);
    }

    #[test]
    fn test_score_input_accepts_number_and_string() {
        let req: CreateGradeRequest =
            serde_json::from_str(r#"{"student_id":1,"activity_id":2,"value":9.5}"#).unwrap();
        assert_eq!(req.value, ScoreInput::Number(9.5));

        let req: CreateGradeRequest =
            serde_json::from_str(r#"{"student_id":1,"activity_id":2,"value":"9.5"}"#).unwrap();
        assert_eq!(req.value.parse(), Some(9.5));
    }
}
