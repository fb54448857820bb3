//! Unit tests for Docker Compose generation

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {

    use devkit::compose::template::TemplateSource;
    use devkit::compose::{build_services, generate_compose_content, render_healthcheck};
    use devkit::config::yaml::load_config;
    use devkit::config::{Database, DatabaseType, DevEnvConfig, HealthCheck, Service};
    use devkit::error::DevkitError;
    use devkit::system::mock::MockSystem;
    use serde_yaml::Value;
    use std::path::Path;

    fn database(kind: DatabaseType, port: Option<u16>) -> Database {
        let mut db = Database::new(kind);
        db.port = port;
        db
    }

    fn generate(config: &DevEnvConfig) -> String {
        generate_compose_content(&MockSystem::new(), config, &TemplateSource::Embedded).unwrap()
    }

    fn parse(content: &str) -> Value {
        serde_yaml::from_str(content).unwrap()
    }

    #[test]
    fn postgres_and_redis_document() {
        let mut config = DevEnvConfig::named("demo");
        let mut pg = database(DatabaseType::Postgresql, Some(5432));
        pg.version = Some("15".to_owned());
        pg.user = Some("app".to_owned());
        pg.password = Some("secret".to_owned());
        pg.database = Some("myapp".to_owned());
        config.databases = vec![pg, database(DatabaseType::Redis, Some(6379))];

        let content = generate(&config);
        assert!(content.contains("5432:5432"));
        assert!(content.contains("6379:6379"));
        assert!(content.contains("POSTGRES_DB"));
        assert_eq!(content.matches("interval: 10s").count(), 2);

        let doc = parse(&content);
        let pg = &doc["services"]["postgresql_1"];
        assert_eq!(pg["image"], Value::from("postgres:15"));
        assert_eq!(pg["environment"]["POSTGRES_USER"], Value::from("app"));
        assert_eq!(pg["environment"]["POSTGRES_DB"], Value::from("myapp"));
        assert_eq!(pg["healthcheck"]["retries"], Value::from(5));
        assert_eq!(pg["healthcheck"]["test"][1], Value::from("pg_isready"));
        assert_eq!(pg["networks"][0], Value::from("dev-network"));

        let redis = &doc["services"]["redis_2"];
        assert_eq!(redis["image"], Value::from("redis"));
        assert!(redis.get("environment").is_none());
        assert_eq!(
            doc["networks"]["dev-network"]["driver"],
            Value::from("bridge")
        );
    }

    #[test]
    fn output_is_deterministic() {
        let mut config = DevEnvConfig::named("demo");
        config.databases = vec![database(DatabaseType::Mongodb, None)];
        config.services = vec![Service::new("rabbitmq")];

        assert_eq!(generate(&config), generate(&config));
    }

    #[test]
    fn empty_config_renders_valid_yaml() {
        let content = generate(&DevEnvConfig::named("empty"));
        let doc = parse(&content);

        assert!(content.contains("services: {}"));
        assert_eq!(doc["services"].as_mapping().unwrap().len(), 0);
        assert!(doc["networks"]["dev-network"].is_mapping());
    }

    #[test]
    fn sqlite_is_not_containerized() {
        let mut config = DevEnvConfig::named("demo");
        config.databases = vec![
            database(DatabaseType::Sqlite, None),
            database(DatabaseType::Mysql, None),
        ];

        let services = build_services(&config);
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].name, "mysql_2");
        assert_eq!(services[0].ports, vec!["3306:3306"]);
    }

    #[test]
    fn names_are_unique() {
        let mut config = DevEnvConfig::named("demo");
        let mut named = database(DatabaseType::Postgresql, None);
        named.name = Some("rabbitmq_1".to_owned());
        let mut twin = database(DatabaseType::Redis, None);
        twin.name = Some("rabbitmq_1".to_owned());
        config.databases = vec![named, twin];
        config.services = vec![Service::new("rabbitmq")];

        let names: Vec<String> = build_services(&config)
            .into_iter()
            .map(|service| service.name)
            .collect();
        assert_eq!(names, vec!["rabbitmq_1", "rabbitmq_1_2", "rabbitmq_1_3"]);

        let doc = parse(&generate(&config));
        assert_eq!(doc["services"].as_mapping().unwrap().len(), 3);
    }

    #[test]
    fn two_unnamed_services_of_one_type() {
        let mut config = DevEnvConfig::named("demo");
        config.services = vec![Service::new("rabbitmq"), Service::new("rabbitmq")];

        let doc = parse(&generate(&config));
        let services = doc["services"].as_mapping().unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(doc["services"]["rabbitmq_1"]["image"], Value::from("rabbitmq"));
        assert_eq!(doc["services"]["rabbitmq_2"]["image"], Value::from("rabbitmq"));
    }

    #[test]
    fn yaml_significant_names_stay_parseable() {
        let mut config = DevEnvConfig::named("demo");
        let mut cache = database(DatabaseType::Redis, None);
        cache.name = Some("cache: primary".to_owned());
        cache.version = Some("7 #alpine".to_owned());
        config.databases = vec![cache];
        config.docker.network_name = "dev #net".to_owned();

        let doc = parse(&generate(&config));
        let service = &doc["services"]["cache: primary"];
        assert_eq!(service["image"], Value::from("redis:7 #alpine"));
        assert_eq!(service["networks"][0], Value::from("dev #net"));
        assert_eq!(doc["networks"]["dev #net"]["driver"], Value::from("bridge"));
    }

    #[test]
    fn empty_credentials_are_left_out() {
        let mut config = DevEnvConfig::named("demo");
        let mut pg = database(DatabaseType::Postgresql, None);
        pg.user = Some(String::new());
        pg.password = Some(String::new());
        pg.database = Some("shop".to_owned());
        let mut mysql = database(DatabaseType::Mysql, None);
        mysql.user = Some(String::new());
        mysql.password = Some("pw".to_owned());
        config.databases = vec![pg, mysql];

        let services = build_services(&config);
        assert_eq!(services[0].env.keys().collect::<Vec<_>>(), vec!["POSTGRES_DB"]);
        assert!(
            services[0]
                .healthcheck
                .as_deref()
                .unwrap()
                .contains(r#"["CMD", "pg_isready", "-U", "postgres"]"#)
        );
        assert_eq!(services[1].env["MYSQL_ROOT_PASSWORD"], "pw");
        assert!(!services[1].env.contains_key("MYSQL_USER"));
        assert!(!services[1].env.contains_key("MYSQL_PASSWORD"));

        let content = generate(&config);
        assert!(!content.contains(": \"\""));
    }

    #[test]
    fn empty_password_from_env_is_not_emitted() {
        let system = MockSystem::new()
            .with_file(
                "/project/.dev-env.yml",
                b"name: demo\ndatabases:\n  - type: postgresql\n    user: app\n    password: ${DB_PASSWORD}\n",
            )
            .unwrap()
            .with_env("DB_PASSWORD", "")
            .unwrap();

        let config = load_config(&system, Path::new("/project")).unwrap();
        assert_eq!(config.databases[0].password.as_deref(), Some(""));

        let content =
            generate_compose_content(&system, &config, &TemplateSource::Embedded).unwrap();
        assert!(content.contains("POSTGRES_USER: \"app\""));
        assert!(!content.contains("POSTGRES_PASSWORD"));
    }

    #[test]
    fn hyphenated_service_types_make_valid_names() {
        let mut config = DevEnvConfig::named("demo");
        let mut service = Service::new("elastic-search");
        service.port = Some(9200);
        service.management_port = Some(9300);
        config.services = vec![service];

        let services = build_services(&config);
        assert_eq!(services[0].name, "elastic_search_1");
        assert_eq!(services[0].image, "elastic-search");
        assert_eq!(services[0].ports, vec!["9200:9200", "9300:9300"]);
        assert!(services[0].healthcheck.is_none());
    }

    #[test]
    fn mysql_password_needs_user() {
        let mut config = DevEnvConfig::named("demo");
        let mut root_only = database(DatabaseType::Mysql, None);
        root_only.password = Some("pw".to_owned());
        let mut with_user = database(DatabaseType::Mariadb, None);
        with_user.user = Some("app".to_owned());
        with_user.password = Some("pw".to_owned());
        config.databases = vec![root_only, with_user];

        let services = build_services(&config);
        assert_eq!(services[0].env["MYSQL_ROOT_PASSWORD"], "pw");
        assert!(!services[0].env.contains_key("MYSQL_PASSWORD"));
        assert_eq!(services[1].env["MYSQL_USER"], "app");
        assert_eq!(services[1].env["MYSQL_PASSWORD"], "pw");
    }

    #[test]
    fn health_check_by_name_wins_over_type() {
        let mut config = DevEnvConfig::named("demo");
        let mut db = database(DatabaseType::Postgresql, None);
        db.name = Some("main-db".to_owned());
        config.databases = vec![db];
        config.health_checks = vec![
            HealthCheck {
                name: "other".to_owned(),
                kind: "postgresql".to_owned(),
                connection_string: Some("postgresql://by-type".to_owned()),
                url: None,
            },
            HealthCheck {
                name: "main-db".to_owned(),
                kind: "postgresql".to_owned(),
                connection_string: Some("postgresql://by-name".to_owned()),
                url: None,
            },
        ];

        let services = build_services(&config);
        let healthcheck = services[0].healthcheck.as_deref().unwrap();
        assert!(healthcheck.contains("\"postgresql://by-name\""));
    }

    #[test]
    fn custom_health_checks_per_engine() {
        let mut config = DevEnvConfig::named("demo");
        config.databases = vec![
            database(DatabaseType::Redis, None),
            database(DatabaseType::Mysql, None),
        ];
        config.health_checks = vec![
            HealthCheck {
                name: "cache".to_owned(),
                kind: "redis".to_owned(),
                connection_string: None,
                url: Some("redis://localhost:6379".to_owned()),
            },
            HealthCheck {
                name: "web".to_owned(),
                kind: "mysql".to_owned(),
                connection_string: None,
                url: Some("http://localhost:8080/health".to_owned()),
            },
        ];

        let services = build_services(&config);
        assert_eq!(
            services[0].healthcheck.as_deref().unwrap().lines().next(),
            Some(r#"test: ["CMD", "redis-cli", "-u", "redis://localhost:6379", "ping"]"#)
        );
        assert!(
            services[1]
                .healthcheck
                .as_deref()
                .unwrap()
                .contains(r#"["CMD", "curl", "-f", "http://localhost:8080/health"]"#)
        );
    }

    #[test]
    fn unusable_health_check_falls_back_to_engine_default() {
        let mut config = DevEnvConfig::named("demo");
        config.databases = vec![database(DatabaseType::Mysql, None)];
        config.health_checks = vec![HealthCheck {
            name: "mysql_1".to_owned(),
            kind: "mysql".to_owned(),
            connection_string: Some("mysql://localhost".to_owned()),
            url: None,
        }];

        let services = build_services(&config);
        assert!(
            services[0]
                .healthcheck
                .as_deref()
                .unwrap()
                .contains(r#"["CMD", "mysqladmin", "ping", "-h", "localhost"]"#)
        );
    }

    #[test]
    fn healthcheck_body() {
        let body = render_healthcheck(&["CMD".to_owned(), "redis-cli".to_owned(), "ping".to_owned()]);
        assert_eq!(
            body,
            "test: [\"CMD\", \"redis-cli\", \"ping\"]\ninterval: 10s\ntimeout: 5s\nretries: 5"
        );
    }

    #[test]
    fn env_values_are_quoted() {
        let mut config = DevEnvConfig::named("demo");
        let mut pg = database(DatabaseType::Postgresql, None);
        pg.password = Some("p@ss: \"word\" # not a comment".to_owned());
        config.databases = vec![pg];

        let doc = parse(&generate(&config));
        assert_eq!(
            doc["services"]["postgresql_1"]["environment"]["POSTGRES_PASSWORD"],
            Value::from("p@ss: \"word\" # not a comment")
        );
    }

    #[test]
    fn custom_network_name() {
        let mut config = DevEnvConfig::named("demo");
        config.docker.network_name = "shop-net".to_owned();
        config.services = vec![Service::new("rabbitmq")];

        let doc = parse(&generate(&config));
        assert_eq!(doc["services"]["rabbitmq_1"]["networks"][0], Value::from("shop-net"));
        assert!(doc["networks"]["shop-net"].is_mapping());
    }

    #[test]
    fn template_directory_without_template() {
        let system = MockSystem::new().with_dir("/templates").unwrap();
        let source = TemplateSource::Directory("/templates".into());

        let err = generate_compose_content(&system, &DevEnvConfig::named("demo"), &source)
            .unwrap_err();
        assert!(matches!(err, DevkitError::TemplateNotFound { .. }));
        assert!(err.to_string().contains("/templates/docker-compose.yml.j2"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn template_directory_override() {
        let system = MockSystem::new()
            .with_file(
                "/templates/docker-compose.yml.j2",
                b"{% for s in services %}{{ s.name }}\n{% endfor %}",
            )
            .unwrap();
        let mut config = DevEnvConfig::named("demo");
        config.services = vec![Service::new("rabbitmq"), Service::new("nats")];

        let content = generate_compose_content(
            &system,
            &config,
            &TemplateSource::Directory("/templates".into()),
        )
        .unwrap();
        assert_eq!(content, "rabbitmq_1\nnats_2\n");
    }

    #[test]
    fn broken_template_is_a_template_error() {
        let source = TemplateSource::Inline("{% for %}".to_owned());
        let err = generate_compose_content(&MockSystem::new(), &DevEnvConfig::named("demo"), &source)
            .unwrap_err();
        assert!(matches!(err, DevkitError::Template { .. }));
    }
}
