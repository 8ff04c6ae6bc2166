use super::test_helpers::*;
use super::*;
use crate::config::CustomExportConfig;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
