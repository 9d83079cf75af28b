use crate::{
    Res,
    pipeline::TrackSource,
    spotify::SpotifyClient,
    types::{
        AudioFeaturesResponse, Features, GetUserPlaylistsResponse, PlaylistSummary,
        PlaylistTracksResponse, SavedTracksResponse, TrackPage,
    },
};

/// Page size used when listing the account's playlists.
const PLAYLISTS_PAGE: usize = 50;

impl TrackSource for SpotifyClient {
    /// `GET /me/tracks`
    fn saved_tracks(&mut self, limit: usize, offset: usize) -> Res<TrackPage> {
        let url = self.url("me/tracks");
        let res: SavedTracksResponse = self.get(
            &url,
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )?;

        let has_next = res.next.is_some();
        Ok(TrackPage {
            has_next,
            ..TrackPage::from(res.items)
        })
    }

    /// `GET /me/playlists`, following `next` until the last page.
    fn playlists(&mut self) -> Res<Vec<PlaylistSummary>> {
        let mut playlists = Vec::new();
        let mut res: GetUserPlaylistsResponse = {
            let url = self.url("me/playlists");
            self.get(&url, &[("limit", PLAYLISTS_PAGE.to_string())])?
        };

        loop {
            playlists.extend(res.items.into_iter().map(PlaylistSummary::from));
            match res.next {
                Some(next) => res = self.get(&next, &[])?,
                None => break,
            }
        }

        Ok(playlists)
    }

    /// `GET /playlists/{id}/tracks`
    fn playlist_tracks(&mut self, playlist_id: &str, limit: usize, offset: usize) -> Res<TrackPage> {
        let url = self.url(&format!("playlists/{playlist_id}/tracks"));
        let res: PlaylistTracksResponse = self.get(
            &url,
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )?;

        let has_next = res.next.is_some();
        Ok(TrackPage {
            has_next,
            ..TrackPage::from(res.items)
        })
    }

    /// `GET /audio-features?ids=...`
    fn audio_features(&mut self, ids: &[String]) -> Res<Vec<Option<Features>>> {
        let url = self.url("audio-features");
        let res: AudioFeaturesResponse = self.get(&url, &[("ids", ids.join(","))])?;
        Ok(res.audio_features)
    }
}
