// API 业务错误码
//
// 0 表示成功；1xxx 通用错误；2xxx 认证；3xxx 教师账号；
// 4xxx 科目；5xxx 学生；6xxx 活动；7xxx 成绩
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    RateLimitExceeded = 1029,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,

    // 教师账号
    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserNameAlreadyExists = 3004,
    UserEmailAlreadyExists = 3005,
    UserInactive = 3006,

    // 科目
    SubjectNotFound = 4000,
    SubjectPermissionDenied = 4001,
    SubjectNameInvalid = 4002,

    // 学生
    StudentNotFound = 5000,
    StudentEmailAlreadyExists = 5001,
    StudentInvalid = 5002,

    // 活动
    ActivityNotFound = 6000,
    ActivityInvalid = 6001,

    // 成绩
    GradeNotFound = 7000,
    GradeAlreadyExists = 7001,
    GradeOutOfRange = 7002,
    StudentNotEnrolled = 7003,
}
