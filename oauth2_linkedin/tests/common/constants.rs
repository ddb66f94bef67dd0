//! Values shared between the mock server and the tests

pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
pub const TEST_CALLBACK_URL: &str = "https://app.example.com/auth/linkedin/callback";

pub const TEST_CODE: &str = "valid-authorization-code";
pub const TEST_ACCESS_TOKEN: &str = "AQV-test-access-token";

pub const TEST_MEMBER_ID: &str = "yrZCpj2Z12";
pub const TEST_EMAIL: &str = "jane.doe@example.com";
