//! Client of the BoardGameGeek XML API 2

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::lookup::{GameDetails, GameLookup, GameSummary, LookupError};

#[derive(Deserialize, Debug)]
struct ValueAttr {
    #[serde(rename = "@value")]
    value: String,
}

#[derive(Deserialize, Debug)]
struct NameAttr {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "@value")]
    value: String,
}

#[derive(Deserialize, Debug)]
struct SearchItems {
    #[serde(rename = "item", default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize, Debug)]
struct SearchItem {
    #[serde(rename = "@id")]
    id: String,
    name: Option<ValueAttr>,
    yearpublished: Option<ValueAttr>,
}

#[derive(Deserialize, Debug)]
struct ThingItems {
    #[serde(rename = "item", default)]
    items: Vec<ThingItem>,
}

#[derive(Deserialize, Debug)]
struct ThingItem {
    #[serde(rename = "@id")]
    id: String,
    thumbnail: Option<String>,
    image: Option<String>,
    #[serde(rename = "name", default)]
    names: Vec<NameAttr>,
    description: Option<String>,
    yearpublished: Option<ValueAttr>,
    minplayers: Option<ValueAttr>,
    maxplayers: Option<ValueAttr>,
    playingtime: Option<ValueAttr>,
}

fn number(attr: Option<ValueAttr>) -> u32 {
    attr.and_then(|a| a.value.trim().parse().ok()).unwrap_or(0)
}

fn parse_search(xml: &str) -> Result<Vec<GameSummary>, LookupError> {
    let items: SearchItems = quick_xml::de::from_str(xml)?;

    Ok(items
        .items
        .into_iter()
        .map(|item| GameSummary {
            id: item.id,
            name: item
                .name
                .map(|n| n.value)
                .unwrap_or_else(|| String::from("Unknown Game")),
            year: item.yearpublished.map(|y| y.value).unwrap_or_default(),
        })
        .collect())
}

fn parse_thing(xml: &str) -> Result<Option<GameDetails>, LookupError> {
    let items: ThingItems = quick_xml::de::from_str(xml)?;

    let Some(item) = items.items.into_iter().next() else {
        return Ok(None);
    };

    let name = item
        .names
        .iter()
        .find(|n| n.kind == "primary")
        .or(item.names.first())
        .map(|n| n.value.clone())
        .unwrap_or_else(|| String::from("Unknown Game"));

    Ok(Some(GameDetails {
        id: item.id,
        name,
        year: item.yearpublished.map(|y| y.value).unwrap_or_default(),
        description: item.description.unwrap_or_default(),
        image: item.image.unwrap_or_default(),
        thumbnail: item.thumbnail.unwrap_or_default(),
        min_players: number(item.minplayers),
        max_players: number(item.maxplayers),
        playing_time: number(item.playingtime),
    }))
}

/// A [GameLookup] backed by BoardGameGeek
pub struct BggClient {
    http: reqwest::Client,
    base_url: String,
}

impl BggClient {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, path: &str, query: &[(&str, &str)]) -> Result<String, LookupError> {
        let url = format!("{}/{path}", self.base_url);
        debug!("Requesting {url}");

        let response = self.http.get(&url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status()));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl GameLookup for BggClient {
    async fn search(&self, query: &str) -> Result<Vec<GameSummary>, LookupError> {
        let xml = self
            .fetch("search", &[("query", query), ("type", "boardgame")])
            .await?;

        parse_search(&xml)
    }

    async fn details(&self, id: &str) -> Result<Option<GameDetails>, LookupError> {
        let xml = self.fetch("thing", &[("id", id), ("stats", "1")]).await?;

        parse_thing(&xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<items total="2" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
    <item type="boardgame" id="13">
        <name type="primary" value="CATAN"/>
        <yearpublished value="1995" />
    </item>
    <item type="boardgame" id="27710">
        <name type="primary" value="Catan Dice Game"/>
    </item>
</items>"#;

    const THING: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
    <item type="boardgame" id="13">
        <thumbnail>https://example.org/thumb.jpg</thumbnail>
        <image>https://example.org/image.jpg</image>
        <name type="alternate" sortindex="1" value="Die Siedler von Catan" />
        <name type="primary" sortindex="1" value="CATAN" />
        <description>Trade, build and settle.</description>
        <yearpublished value="1995" />
        <minplayers value="3" />
        <maxplayers value="4" />
        <playingtime value="120" />
        <link type="boardgamecategory" id="1021" value="Economic" />
    </item>
</items>"#;

    #[test]
    fn parses_search_results() {
        let games = parse_search(SEARCH).unwrap();

        assert_eq!(games.len(), 2);
        assert_eq!(
            games[0],
            GameSummary {
                id: "13".into(),
                name: "CATAN".into(),
                year: "1995".into(),
            }
        );
        assert_eq!(games[1].year, "");
    }

    #[test]
    fn parses_empty_search() {
        let xml = r#"<items total="0" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse"></items>"#;
        assert!(parse_search(xml).unwrap().is_empty());
    }

    #[test]
    fn parses_details_with_primary_name() {
        let details = parse_thing(THING).unwrap().unwrap();

        assert_eq!(details.id, "13");
        assert_eq!(details.name, "CATAN");
        assert_eq!(details.description, "Trade, build and settle.");
        assert_eq!(details.thumbnail, "https://example.org/thumb.jpg");
        assert_eq!(details.min_players, 3);
        assert_eq!(details.max_players, 4);
        assert_eq!(details.playing_time, 120);
    }

    #[test]
    fn unknown_thing_is_absent() {
        let xml = r#"<items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse"></items>"#;
        assert_eq!(parse_thing(xml).unwrap(), None);
    }
}
