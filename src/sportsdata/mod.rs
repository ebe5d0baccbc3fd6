//! Client for the OpenLigaDB Sportsdata webservice.
//!
//! <http://www.openligadb.de/Webservices/Sportsdata.asmx>
//!
//! One method per remote operation, each a single blocking round-trip. Most
//! methods return a `Vec<Record>`; the attributes of a [`Record`] carry
//! whatever tags the service returned, as verbatim strings.
//!
//! ```no_run
//! use openligadb::Sportsdata;
//!
//! let api = Sportsdata::new();
//! let matches = api.get_matchdata_by_group_league_saison(14, "bl1", 2010)?;
//! for game in &matches {
//!     println!(
//!         "{} vs. {}",
//!         game.get("nameTeam1").unwrap_or("?"),
//!         game.get("nameTeam2").unwrap_or("?")
//!     );
//! }
//! # Ok::<(), openligadb::Error>(())
//! ```

use crate::soap;
use crate::{Error, Record};
use chrono::NaiveDateTime;

/// The public Sportsdata endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://www.openligadb.de/Webservices/Sportsdata.asmx";

/// Datetime layout the service speaks, requests and responses alike.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Blocking client for the Sportsdata webservice. Holds nothing but the
/// endpoint and the HTTP client handle; there is no session state between
/// calls.
pub struct Sportsdata {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl Default for Sportsdata {
    fn default() -> Self {
        Self::new()
    }
}

impl Sportsdata {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Points the client somewhere other than [`DEFAULT_ENDPOINT`], e.g. a
    /// mirror or a test server.
    pub fn with_endpoint(endpoint: &str) -> Self {
        Sportsdata {
            endpoint: endpoint.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// One round-trip: POST the envelope, return the raw response body.
    fn call(&self, operation: &str, params: &[(&str, String)]) -> Result<String, Error> {
        log::debug!("Calling {} at {}", operation, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{}\"", soap::soap_action(operation)))
            .body(soap::envelope(operation, params))
            .send()?;
        let status_error = response.error_for_status_ref().err();
        let body = response.text()?;
        log::trace!("{}", body);
        match status_error {
            None => Ok(body),
            Some(error) => {
                // .asmx faults arrive as HTTP 500 with a fault document in
                // the body; surface the fault rather than the bare status.
                if let Ok(doc) = roxmltree::Document::parse(&body) {
                    soap::check_fault(&doc)?;
                }
                Err(error.into())
            }
        }
    }

    fn call_list(&self, operation: &str, params: &[(&str, String)]) -> Result<Vec<Record>, Error> {
        let body = self.call(operation, params)?;
        soap::result_records(&body, operation)
    }

    fn call_single(
        &self,
        operation: &str,
        params: &[(&str, String)],
    ) -> Result<Option<Record>, Error> {
        let body = self.call(operation, params)?;
        soap::result_record(&body, operation)
    }

    fn call_text(&self, operation: &str, params: &[(&str, String)]) -> Result<String, Error> {
        let body = self.call(operation, params)?;
        soap::result_text(&body, operation)
    }

    /// The groups (rounds, half-final, final, ...) available for a league
    /// and season.
    pub fn get_avail_groups(
        &self,
        league_shortcut: &str,
        league_saison: i32,
    ) -> Result<Vec<Record>, Error> {
        self.call_list(
            "GetAvailGroups",
            &[
                ("leagueShortcut", league_shortcut.to_string()),
                ("leagueSaison", league_saison.to_string()),
            ],
        )
    }

    /// All leagues the service knows. The `leagueShortcut` attribute of the
    /// returned records is what the other calls take as league parameter.
    pub fn get_avail_leagues(&self) -> Result<Vec<Record>, Error> {
        self.call_list("GetAvailLeagues", &[])
    }

    /// All leagues of one sport, see [`get_avail_sports`](Self::get_avail_sports)
    /// for the IDs.
    pub fn get_avail_leagues_by_sports(&self, sport_id: i32) -> Result<Vec<Record>, Error> {
        self.call_list(
            "GetAvailLeaguesBySports",
            &[("sportID", sport_id.to_string())],
        )
    }

    /// All sports the service knows.
    pub fn get_avail_sports(&self) -> Result<Vec<Record>, Error> {
        self.call_list("GetAvailSports", &[])
    }

    /// The current group of a league, i.e. the round ("Spieltag") of the
    /// German Bundesliga.
    pub fn get_current_group(&self, league_shortcut: &str) -> Result<Option<Record>, Error> {
        self.call_single(
            "GetCurrentGroup",
            &[("leagueShortcut", league_shortcut.to_string())],
        )
    }

    /// The current group of a league as a plain order ID.
    pub fn get_current_group_order_id(&self, league_shortcut: &str) -> Result<i32, Error> {
        let text = self.call_text(
            "GetCurrentGroupOrderID",
            &[("leagueShortcut", league_shortcut.to_string())],
        )?;
        Ok(text.trim().parse()?)
    }

    /// Scorers of a league and season, sorted by goals scored.
    pub fn get_goal_getters_by_league_saison(
        &self,
        league_shortcut: &str,
        league_saison: i32,
    ) -> Result<Vec<Record>, Error> {
        self.call_list(
            "GetGoalGettersByLeagueSaison",
            &[
                ("leagueShortcut", league_shortcut.to_string()),
                ("leagueSaison", league_saison.to_string()),
            ],
        )
    }

    /// All goals of a league and season.
    pub fn get_goals_by_league_saison(
        &self,
        league_shortcut: &str,
        league_saison: i32,
    ) -> Result<Vec<Record>, Error> {
        self.call_list(
            "GetGoalsByLeagueSaison",
            &[
                ("leagueShortcut", league_shortcut.to_string()),
                ("leagueSaison", league_saison.to_string()),
            ],
        )
    }

    /// All goals of one match. A match without goals yields an empty list.
    pub fn get_goals_by_match(&self, match_id: i32) -> Result<Vec<Record>, Error> {
        self.call_list("GetGoalsByMatch", &[("matchID", match_id.to_string())])
    }

    /// When the data of a group last changed. Useful to poll cheaply before
    /// fetching the whole matchday again.
    pub fn get_last_change_date_by_group_league_saison(
        &self,
        group_order_id: i32,
        league_shortcut: &str,
        league_saison: i32,
    ) -> Result<NaiveDateTime, Error> {
        let text = self.call_text(
            "GetLastChangeDateByGroupLeagueSaison",
            &[
                ("groupOrderID", group_order_id.to_string()),
                ("leagueShortcut", league_shortcut.to_string()),
                ("leagueSaison", league_saison.to_string()),
            ],
        )?;
        parse_datetime(&text)
    }

    /// When the data of a league and season last changed.
    pub fn get_last_change_date_by_league_saison(
        &self,
        league_shortcut: &str,
        league_saison: i32,
    ) -> Result<NaiveDateTime, Error> {
        let text = self.call_text(
            "GetLastChangeDateByLeagueSaison",
            &[
                ("leagueShortcut", league_shortcut.to_string()),
                ("leagueSaison", league_saison.to_string()),
            ],
        )?;
        parse_datetime(&text)
    }

    /// The most recently played match of a league.
    pub fn get_last_match(&self, league_shortcut: &str) -> Result<Option<Record>, Error> {
        self.call_single(
            "GetLastMatch",
            &[("leagueShortcut", league_shortcut.to_string())],
        )
    }

    /// The most recently played match of one team in a league.
    pub fn get_last_match_by_league_team(
        &self,
        league_id: i32,
        team_id: i32,
    ) -> Result<Option<Record>, Error> {
        self.call_single(
            "GetLastMatchByLeagueTeam",
            &[
                ("leagueID", league_id.to_string()),
                ("teamID", team_id.to_string()),
            ],
        )
    }

    /// One specific match.
    pub fn get_match_by_match_id(&self, match_id: i32) -> Result<Option<Record>, Error> {
        self.call_single("GetMatchByMatchID", &[("matchID", match_id.to_string())])
    }

    /// All matches of one group (round) in a league and season.
    pub fn get_matchdata_by_group_league_saison(
        &self,
        group_order_id: i32,
        league_shortcut: &str,
        league_saison: i32,
    ) -> Result<Vec<Record>, Error> {
        self.call_list(
            "GetMatchdataByGroupLeagueSaison",
            &[
                ("groupOrderID", group_order_id.to_string()),
                ("leagueShortcut", league_shortcut.to_string()),
                ("leagueSaison", league_saison.to_string()),
            ],
        )
    }

    /// All matches of a league between two points in time.
    pub fn get_matchdata_by_league_date_time(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        league_shortcut: &str,
    ) -> Result<Vec<Record>, Error> {
        self.call_list(
            "GetMatchdataByLeagueDateTime",
            &[
                ("fromDateTime", from.format(DATETIME_FORMAT).to_string()),
                ("toDateTime", to.format(DATETIME_FORMAT).to_string()),
                ("leagueShortcut", league_shortcut.to_string()),
            ],
        )
    }

    /// All matches of a league and season. May take a while on the wire.
    pub fn get_matchdata_by_league_saison(
        &self,
        league_shortcut: &str,
        league_saison: i32,
    ) -> Result<Vec<Record>, Error> {
        self.call_list(
            "GetMatchdataByLeagueSaison",
            &[
                ("leagueShortcut", league_shortcut.to_string()),
                ("leagueSaison", league_saison.to_string()),
            ],
        )
    }

    /// All matches at which two teams played against each other.
    pub fn get_matchdata_by_teams(
        &self,
        team_id_1: i32,
        team_id_2: i32,
    ) -> Result<Vec<Record>, Error> {
        self.call_list(
            "GetMatchdataByTeams",
            &[
                ("teamID1", team_id_1.to_string()),
                ("teamID2", team_id_2.to_string()),
            ],
        )
    }

    /// The upcoming match of a league.
    pub fn get_next_match(&self, league_shortcut: &str) -> Result<Option<Record>, Error> {
        self.call_single(
            "GetNextMatch",
            &[("leagueShortcut", league_shortcut.to_string())],
        )
    }

    /// The upcoming match of one team in a league.
    pub fn get_next_match_by_league_team(
        &self,
        league_id: i32,
        team_id: i32,
    ) -> Result<Option<Record>, Error> {
        self.call_single(
            "GetNextMatchByLeagueTeam",
            &[
                ("leagueID", league_id.to_string()),
                ("teamID", team_id.to_string()),
            ],
        )
    }

    /// All teams of a league and season. The `teamID` attribute of the
    /// returned records is what the by-team calls take.
    pub fn get_teams_by_league_saison(
        &self,
        league_shortcut: &str,
        league_saison: i32,
    ) -> Result<Vec<Record>, Error> {
        self.call_list(
            "GetTeamsByLeagueSaison",
            &[
                ("leagueShortcut", league_shortcut.to_string()),
                ("leagueSaison", league_saison.to_string()),
            ],
        )
    }
}

/// The service serializes datetimes with an optional fractional part.
fn parse_datetime(text: &str) -> Result<NaiveDateTime, Error> {
    Ok(NaiveDateTime::parse_from_str(
        text.trim(),
        "%Y-%m-%dT%H:%M:%S%.f",
    )?)
}
