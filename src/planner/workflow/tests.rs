#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::{Config, ProviderConfig};
    use crate::llm::CompletionService;
    use crate::planner::context::PlannerContext;
    use crate::planner::memory::{MemoryScope, StateKey};
    use crate::planner::prompts::{EXPENSE_FALLBACK, REPORT_FALLBACK};
    use crate::planner::stage::PipelineStage;
    use crate::planner::stages::ExpenseStage;
    use crate::planner::workflow::{TimingScope, TravelPipeline, run};
    use crate::types::trip::TripRequest;

    #[derive(Default)]
    struct FakeLlm {
        fail: bool,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeLlm {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionService for FakeLlm {
        async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
            let call_index = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((system_prompt.to_string(), user_prompt.to_string()));
                calls.len()
            };
            if self.fail {
                bail!("model unavailable");
            }
            if call_index == 1 {
                Ok("Flight Cost: 5200\nTotal Estimated Trip Cost: 21000".to_string())
            } else {
                Ok("# ✈️ Hyderabad Trip\n## Hotels\n- **Taj Krishna**: ₹8,000\n- Carry an umbrella".to_string())
            }
        }
    }

    async fn mount_travel_apis(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "Hyderabad", "latitude": 17.385, "longitude": 78.4867}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "daily": {
                    "time": ["2025-07-09"],
                    "temperature_2m_max": [31.0],
                    "temperature_2m_min": [23.0],
                    "precipitation_sum": [1.2],
                    "weathercode": [61]
                }
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "hotels in area Hyderabad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "local_results": [{"title": "Taj Krishna", "price": "₹8,000"}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "restaurants in area Hyderabad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "local_results": [{"title": "Paradise Biryani", "type": "Biryani restaurant"}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "google_flights"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "best_flights": [{"price": 5200, "total_duration": 125}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("q", "metro station"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "local_results": [{"title": "Khairatabad Metro Station"}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "google_maps"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "local_results": [{"title": "TSRTC Bus Depot", "type": "Bus station"}]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/places"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "features": [{"properties": {"name": "Charminar"}, "geometry": {"coordinates": [78.47, 17.36]}}]
            })))
            .mount(server)
            .await;
    }

    fn test_config(server: &MockServer, output: &TempDir) -> Config {
        Config {
            output_path: output.path().join("reports"),
            providers: ProviderConfig {
                serpapi_key: "serp-key".to_string(),
                geoapify_key: "geo-key".to_string(),
                geocoding_url: format!("{}/v1/search", server.uri()),
                weather_url: format!("{}/v1/forecast", server.uri()),
                serpapi_url: format!("{}/search.json", server.uri()),
                geoapify_url: format!("{}/v2/places", server.uri()),
                ..Default::default()
            },
            check_llm_connection: false,
            ..Default::default()
        }
    }

    fn sample_trip() -> TripRequest {
        TripRequest {
            city: "Hyderabad".to_string(),
            origin_city: "DEL".to_string(),
            destination_city: "HYD".to_string(),
            outbound_date: NaiveDate::from_ymd_opt(2025, 7, 9).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 7, 12),
            num_days: 3,
        }
    }

    /// trip作用域内按写入顺序排列的键
    async fn trip_write_order(context: &PlannerContext) -> Vec<String> {
        let memory = context.memory.read().await;
        let prefix = format!("{}:", MemoryScope::TRIP);
        memory
            .write_order()
            .iter()
            .filter_map(|record| record.full_key.strip_prefix(&prefix))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_stage_names_default_order() {
        let pipeline = TravelPipeline::new(&Config::default());
        assert_eq!(
            pipeline.stage_names(),
            vec![
                "geocode",
                "weather",
                "hotels",
                "flights",
                "transport",
                "restaurants",
                "attractions",
                "expense",
                "final_report"
            ]
        );
    }

    #[test]
    fn test_stage_names_with_nearby_transport() {
        let config = Config {
            include_nearby_transport: true,
            ..Default::default()
        };
        let names = TravelPipeline::new(&config).stage_names();
        assert_eq!(names.len(), 10);
        assert_eq!(names[4], "transport");
        assert_eq!(names[5], "nearby_transport");
        assert_eq!(names[6], "restaurants");
    }

    #[test]
    fn test_timing_scope_keeps_phase_order() {
        let mut timing = TimingScope::new();
        timing.start_phase("geocode");
        timing.end_phase("geocode");
        timing.start_phase("weather");
        timing.end_phase("weather");

        assert!(timing.end_phase("unknown").is_none());
        let phases: Vec<&str> = timing
            .get_phase_durations()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(phases, vec!["geocode", "weather"]);

        let report = timing.generate_timing_report();
        assert!(report.contains("总执行时间"));
        assert!(report.contains("- geocode:"));
    }

    #[tokio::test]
    async fn test_pipeline_writes_keys_in_stage_order() {
        let server = MockServer::start().await;
        mount_travel_apis(&server).await;
        let output = TempDir::new().unwrap();
        let llm = Arc::new(FakeLlm::default());
        let context = PlannerContext::new(test_config(&server, &output), llm.clone()).unwrap();

        let (state, saved) = run(&context, sample_trip()).await.unwrap();

        assert_eq!(
            trip_write_order(&context).await,
            vec![
                "trip_request",
                "destination",
                "weather",
                "hotels",
                "flights",
                "transport",
                "restaurants",
                "attractions",
                "expenses",
                "final_report"
            ]
        );

        // 每个阶段的输出都在其必需字段之后写入
        let order = trip_write_order(&context).await;
        let position = |key: StateKey| order.iter().position(|k| k == key.as_str()).unwrap();
        assert!(position(StateKey::Expenses) > position(StateKey::Attractions));
        assert!(position(StateKey::FinalReport) > position(StateKey::Expenses));
        assert!(position(StateKey::Transport) > position(StateKey::Destination));

        assert_eq!(state.hotels[0].name, "Taj Krishna");
        assert_eq!(state.restaurants[0].meals_available, "Biryani restaurant");
        assert_eq!(state.flights.len(), 1);
        assert_eq!(state.transport[0].name, "TSRTC Bus Depot");
        assert_eq!(state.attractions[0].name, "Charminar");
        assert!(state.nearby_transport.is_none());
        assert_eq!(state.weather.as_ref().unwrap().summary.rainy_days, 1);
        assert!(state.expenses.as_deref().unwrap().contains("Total Estimated Trip Cost"));

        let calls = llm.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].0.contains("Please write your answer in English"));
        assert!(calls[0].1.contains("City Name: Hyderabad"));
        assert!(calls[0].1.contains("\"name\": \"Taj Krishna\""));
        assert!(calls[1].1.contains("Flight Cost: 5200"));
        assert!(calls[1].1.contains("**Date of Travel**: 2025-07-09 to 2025-07-12"));

        let markdown = saved.markdown_path.unwrap();
        let file_name = markdown.file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("DEL_to_HYD_"));
        assert!(file_name.ends_with(".md"));
        assert!(saved.document_path.unwrap().exists());
        assert!(saved.state_path.is_none());

        let timing_keys = context.memory.read().await.list_keys(MemoryScope::TIMING);
        assert_eq!(timing_keys.len(), 9);
    }

    #[tokio::test]
    async fn test_nearby_transport_runs_after_transport() {
        let server = MockServer::start().await;
        mount_travel_apis(&server).await;
        let output = TempDir::new().unwrap();
        let mut config = test_config(&server, &output);
        config.include_nearby_transport = true;
        config.save_state = true;
        config.render_document = false;
        let llm = Arc::new(FakeLlm::default());
        let context = PlannerContext::new(config, llm.clone()).unwrap();

        let (state, saved) = run(&context, sample_trip()).await.unwrap();

        let order = trip_write_order(&context).await;
        let transport = order.iter().position(|k| k == "transport").unwrap();
        assert_eq!(order[transport + 1], "nearby_transport");
        assert_eq!(
            state.nearby_transport.unwrap()[0].name,
            "Khairatabad Metro Station"
        );
        assert!(llm.calls()[1].1.contains("Nearby metro station options"));

        assert!(saved.document_path.is_none());
        let state_path = saved.state_path.unwrap();
        let snapshot: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(state_path).unwrap()).unwrap();
        assert_eq!(snapshot["trip_request"]["city"], "Hyderabad");
        assert_eq!(snapshot["destination"]["latitude"], 17.385);
        assert_eq!(snapshot["nearby_transport"][0]["name"], "Khairatabad Metro Station");
    }

    #[tokio::test]
    async fn test_geocoding_failure_halts_pipeline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;
        let output = TempDir::new().unwrap();
        let llm = Arc::new(FakeLlm::default());
        let context = PlannerContext::new(test_config(&server, &output), llm.clone()).unwrap();

        let result = run(&context, sample_trip()).await;

        assert!(result.is_err());
        assert_eq!(trip_write_order(&context).await, vec!["trip_request"]);
        assert!(llm.calls().is_empty());
        assert!(!output.path().join("reports").exists());
    }

    #[tokio::test]
    async fn test_llm_failure_uses_fallback_texts() {
        let server = MockServer::start().await;
        mount_travel_apis(&server).await;
        let output = TempDir::new().unwrap();
        let llm = Arc::new(FakeLlm::failing());
        let context = PlannerContext::new(test_config(&server, &output), llm.clone()).unwrap();

        let (state, _saved) = run(&context, sample_trip()).await.unwrap();

        assert_eq!(state.expenses.as_deref(), Some(EXPENSE_FALLBACK));
        assert_eq!(state.final_report.as_deref(), Some(REPORT_FALLBACK));
        assert!(llm.calls()[1].1.contains(EXPENSE_FALLBACK));
    }

    #[tokio::test]
    async fn test_providers_down_still_produce_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"latitude": 17.385, "longitude": 78.4867}]
            })))
            .mount(&server)
            .await;
        let output = TempDir::new().unwrap();
        let llm = Arc::new(FakeLlm::default());
        let context = PlannerContext::new(test_config(&server, &output), llm.clone()).unwrap();

        let (state, saved) = run(&context, sample_trip()).await.unwrap();

        assert!(state.weather.is_none());
        assert!(state.hotels.is_empty());
        assert!(state.flights.is_empty());
        assert!(state.attractions.is_empty());
        assert!(state.final_report.is_some());
        assert!(saved.markdown_path.unwrap().exists());
        assert!(llm.calls()[0].1.contains("Hotels (nightly rates):\n[]"));
    }

    #[tokio::test]
    async fn test_stage_requires_declared_inputs() {
        let server = MockServer::start().await;
        let output = TempDir::new().unwrap();
        let llm = Arc::new(FakeLlm::default());
        let context = PlannerContext::new(test_config(&server, &output), llm.clone()).unwrap();
        context
            .store_to_memory(StateKey::TripRequest, sample_trip())
            .await
            .unwrap();

        let err = ExpenseStage.execute(&context).await.unwrap_err();

        assert!(err.to_string().contains("flights"));
        assert!(!context.has_memory_data(StateKey::Expenses).await);
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_trip_is_rejected_before_any_stage() {
        let server = MockServer::start().await;
        let output = TempDir::new().unwrap();
        let context =
            PlannerContext::new(test_config(&server, &output), Arc::new(FakeLlm::default()))
                .unwrap();
        let trip = TripRequest {
            num_days: 0,
            ..sample_trip()
        };

        assert!(run(&context, trip).await.is_err());
        assert!(context.list_memory_keys().await.is_empty());
    }
}
