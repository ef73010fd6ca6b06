use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 本地存储错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 客户端校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 题目导航错误
    #[error("导航错误: {0}")]
    Navigation(#[from] NavigationError),
    /// 考试流程错误
    #[error("考试错误: {0}")]
    Exam(#[from] ExamError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// 给用户看的消息（toast 文案）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// 是否为登录过期
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Api(ApiError::Unauthorized { .. }))
    }
}

/// API 调用错误
///
/// 对应后端交互的全部失败形态：无响应、超时、401、403、4xx 校验、5xx、
/// 以及信封里 code 非成功的业务失败。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络不可达（没有收到响应）
    #[error("网络请求失败 ({endpoint}): {message}")]
    Network { endpoint: String, message: String },
    /// 请求超时
    #[error("请求超时: {endpoint}")]
    Timeout { endpoint: String },
    /// 登录已过期
    #[error("{message}")]
    Unauthorized { message: String },
    /// 没有权限
    #[error("{message}")]
    Forbidden { message: String },
    /// 资源不存在
    #[error("请求的资源不存在: {endpoint}")]
    NotFound { endpoint: String },
    /// 参数/数据校验失败（400、422）
    #[error("请求校验失败 ({status}): {message}")]
    Validation { status: u16, message: String },
    /// 服务器错误（5xx）
    #[error("服务器错误 ({status}): {message}")]
    Server { status: u16, message: String },
    /// 其他 HTTP 状态
    #[error("请求失败 ({status})")]
    Http { status: u16 },
    /// 信封 code 非 200/0
    #[error("业务失败 (code={code}): {message}")]
    Business { code: i64, message: String },
    /// 响应解析失败
    #[error("响应解析失败 ({endpoint}): {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// 归一化后的提示文案
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network { .. } => "网络连接异常，请检查网络设置".to_string(),
            ApiError::Timeout { .. } => "请求超时，请稍后重试".to_string(),
            ApiError::Unauthorized { message } | ApiError::Forbidden { message } => message.clone(),
            ApiError::NotFound { .. } => "请求的资源不存在".to_string(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Http { status } => format!("请求失败 ({})", status),
            ApiError::Business { message, .. } => message.clone(),
            ApiError::Decode { .. } => "服务器返回格式异常".to_string(),
        }
    }
}

/// 本地存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 读写存储文件失败
    #[error("存储文件读写失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 序列化/反序列化失败
    #[error("存储数据格式错误 ({key}): {source}")]
    Serde {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// 存储锁被污染
    #[error("存储不可用: {0}")]
    Poisoned(String),
}

/// 客户端校验错误
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 单条校验失败
    #[error("{0}")]
    Invalid(String),
    /// 多字段校验失败
    #[error("{}", .0.join("; "))]
    Fields(Vec<String>),
}

/// 题目导航错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    /// 题库为空
    #[error("题库为空，无法开始随机练习")]
    EmptyBank,
    /// 题目不存在
    #[error("题目不存在: {id}")]
    QuestionNotFound { id: u32 },
    /// 培训题目不存在
    #[error("培训题目不存在: {id}")]
    TrainingNotFound { id: u32 },
    /// 错题不存在
    #[error("错题不存在: {id}")]
    WrongNotFound { id: u32 },
    /// 普通题号越界
    #[error("请输入有效的题目ID（1-{max}）")]
    JumpOutOfRange { max: usize },
    /// 培训题号越界
    #[error("请输入有效的入职培训题目ID（G1-G{max}）")]
    TrainingJumpOutOfRange { max: usize },
    /// 未选择答案
    #[error("请先选择一个答案")]
    NoSelection,
    /// 当前没有题目
    #[error("当前没有正在作答的题目")]
    NoCurrentQuestion,
    /// 未登录
    #[error("请先登录以参加考试")]
    NotLoggedIn,
}

/// 考试流程错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExamError {
    /// 已交卷
    #[error("试卷 {exam_id} 已提交")]
    AlreadySubmitted { exam_id: String },
    /// 超过作答时限
    #[error("试卷 {exam_id} 已超过作答时限")]
    DeadlinePassed { exam_id: String },
    /// 题目不在本场考试中
    #[error("题目 {question_id} 不在本场考试中")]
    UnknownQuestion { question_id: u32 },
    /// 选项越界
    #[error("选项必须在1-4之间: {option}")]
    InvalidOption { option: u8 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 解析配置文件失败
    #[error("解析配置文件失败 ({path}): {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项超出允许范围
    #[error("配置项 {field} 超出范围: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建单条校验错误
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::Validation(ValidationError::Invalid(message.into()))
    }
}

impl StorageError {
    /// 创建文件读写错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_user_message_is_normalized() {
        let err = ApiError::Network {
            endpoint: "/questions".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(err.user_message(), "网络连接异常，请检查网络设置");

        let err = ApiError::Validation {
            status: 422,
            message: "题目内容不能为空".to_string(),
        };
        assert_eq!(err.user_message(), "题目内容不能为空");
    }

    #[test]
    fn field_errors_are_joined() {
        let err = ValidationError::Fields(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "a; b");
    }

    #[test]
    fn unauthorized_is_detected_through_app_error() {
        let err: AppError = ApiError::Unauthorized {
            message: "登录已过期，请重新登录".to_string(),
        }
        .into();
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "登录已过期，请重新登录");
    }
}
