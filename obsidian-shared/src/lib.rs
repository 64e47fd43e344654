pub mod config {
    use serde::{Deserialize, Serialize};

    /// Returns the value unless it is missing or blank.
    fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    fn redacted(value: &Option<String>) -> &'static str {
        if non_empty(value).is_some() {
            "<set>"
        } else {
            "<unset>"
        }
    }

    /// Credentials and the playlist that backs the release catalog.
    #[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    pub struct Spotify {
        pub client_id: Option<String>,
        pub client_secret: Option<String>,
        pub playlist_id: Option<String>,
    }
    impl Spotify {
        pub fn client_id(&self) -> Option<&str> {
            non_empty(&self.client_id)
        }

        pub fn client_secret(&self) -> Option<&str> {
            non_empty(&self.client_secret)
        }

        pub fn playlist_id(&self) -> Option<&str> {
            non_empty(&self.playlist_id)
        }
    }
    impl std::fmt::Debug for Spotify {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Spotify")
                .field("client_id", &redacted(&self.client_id))
                .field("client_secret", &redacted(&self.client_secret))
                .field("playlist_id", &self.playlist_id)
                .finish()
        }
    }

    /// Where form submissions are forwarded to.
    #[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    pub struct Discord {
        pub webhook_url: Option<String>,
    }
    impl Discord {
        pub fn webhook_url(&self) -> Option<&str> {
            non_empty(&self.webhook_url)
        }
    }
    impl std::fmt::Debug for Discord {
        // The webhook URL embeds its own token.
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Discord")
                .field("webhook_url", &redacted(&self.webhook_url))
                .finish()
        }
    }

}
