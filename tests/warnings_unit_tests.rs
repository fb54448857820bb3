//! Unit tests for advisory configuration warnings

#[cfg(test)]
mod tests {

    use devkit::config::warnings::{ConfigWarning, collect_config_warnings};
    use devkit::config::{Database, DatabaseType, DevEnvConfig, Service};

    fn credentialed(kind: DatabaseType, user: &str, password: &str) -> Database {
        let mut db = Database::new(kind);
        db.user = Some(user.to_owned());
        db.password = Some(password.to_owned());
        db
    }

    #[test]
    fn clean_config_has_no_warnings() {
        let mut config = DevEnvConfig::named("demo");
        config.databases = vec![credentialed(
            DatabaseType::Postgresql,
            "${DB_USER}",
            "${DB_PASSWORD}",
        )];
        assert!(collect_config_warnings(&config).is_empty());
    }

    #[test]
    fn literal_password_is_flagged() {
        let mut config = DevEnvConfig::named("demo");
        config.databases = vec![credentialed(DatabaseType::Postgresql, "app", "hunter2")];

        assert_eq!(
            collect_config_warnings(&config),
            vec![ConfigWarning::HardcodedSecrets]
        );
        assert!(
            ConfigWarning::HardcodedSecrets
                .to_string()
                .starts_with("Passwords detected in configuration file.")
        );
    }

    #[test]
    fn any_placeholder_silences_the_password_heuristic() {
        let mut config = DevEnvConfig::named("demo");
        config.databases = vec![credentialed(DatabaseType::Postgresql, "${DB_USER}", "hunter2")];
        assert!(collect_config_warnings(&config).is_empty());
    }

    #[test]
    fn missing_credentials_use_one_based_index() {
        let mut config = DevEnvConfig::named("demo");
        let mut no_password = Database::new(DatabaseType::Mariadb);
        no_password.user = Some("${U}".to_owned());
        config.databases = vec![
            Database::new(DatabaseType::Redis),
            Database::new(DatabaseType::Mongodb),
            no_password,
        ];

        let warnings = collect_config_warnings(&config);
        assert_eq!(
            warnings,
            vec![ConfigWarning::MissingCredentials {
                index: 3,
                database_type: "mariadb".to_owned(),
            }]
        );
        assert!(warnings[0].to_string().starts_with("Database 3 (mariadb) is missing user or password."));
    }

    #[test]
    fn empty_credentials_count_as_missing() {
        let mut config = DevEnvConfig::named("demo");
        config.databases = vec![
            credentialed(DatabaseType::Postgresql, "${DB_USER}", ""),
            credentialed(DatabaseType::Mysql, "", "${DB_PASSWORD}"),
        ];

        assert_eq!(
            collect_config_warnings(&config),
            vec![
                ConfigWarning::MissingCredentials {
                    index: 1,
                    database_type: "postgresql".to_owned(),
                },
                ConfigWarning::MissingCredentials {
                    index: 2,
                    database_type: "mysql".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn shared_ports_across_databases_and_services() {
        let mut config = DevEnvConfig::named("demo");
        let mut redis = Database::new(DatabaseType::Redis);
        redis.port = Some(6379);
        let mut twin = Database::new(DatabaseType::Redis);
        twin.port = Some(6379);
        let mut queue = Service::new("rabbitmq");
        queue.port = Some(6379);
        config.databases = vec![redis, twin];
        config.services = vec![queue];

        let warnings = collect_config_warnings(&config);
        assert_eq!(
            warnings,
            vec![
                ConfigWarning::PortConflict { port: 6379 },
                ConfigWarning::PortConflict { port: 6379 },
            ]
        );
        assert_eq!(
            warnings[0].to_string(),
            "Port 6379 is used by multiple services. This may cause conflicts."
        );
    }

    #[test]
    fn implicit_ports_are_not_compared() {
        let mut config = DevEnvConfig::named("demo");
        config.databases = vec![
            Database::new(DatabaseType::Redis),
            Database::new(DatabaseType::Redis),
        ];
        assert!(collect_config_warnings(&config).is_empty());
    }
}
