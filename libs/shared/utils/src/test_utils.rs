use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_role_key: "test-service-role-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_role_key: self.supabase_service_role_key.clone(),
        }
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn service_response(
        id: &str,
        name: &str,
        duration_minutes: i64,
        price: f64,
        staff_ids: &[&str],
    ) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "price": price,
            "duration_minutes": duration_minutes,
            "staff_ids": staff_ids,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn staff_response(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "active": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn working_window_response(
        staff_id: &str,
        day_of_week: i32,
        start_time: &str,
        end_time: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "staff_id": staff_id,
            "day_of_week": day_of_week,
            "start_time": start_time,
            "end_time": end_time,
            "active": true
        })
    }

    pub fn appointment_response(
        staff_id: &str,
        service_id: &str,
        start_time: &str,
        end_time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "service_id": service_id,
            "service_name": "Haircut",
            "duration_minutes": 30,
            "price": 35.0,
            "staff_id": staff_id,
            "staff_name": "Test Stylist",
            "client_id": Uuid::new_v4(),
            "client_name": "Test Client",
            "start_time": start_time,
            "end_time": end_time,
            "status": status,
            "notes": null,
            "payment_status": "pending",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "error": {
                "message": message,
                "code": code
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.supabase_anon_key, "test-anon-key");
        assert!(app_config.is_configured());
    }

    #[test]
    fn test_config_with_url() {
        let config = TestConfig::with_url("http://127.0.0.1:9999");
        assert_eq!(config.supabase_url, "http://127.0.0.1:9999");
        assert_eq!(config.supabase_anon_key, "test-anon-key");
    }
}
