pub mod bucket_policy;
pub mod iam_user;
