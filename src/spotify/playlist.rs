use crate::{
    Res,
    pipeline::PlaylistSink,
    spotify::SpotifyClient,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUser,
    },
};

impl PlaylistSink for SpotifyClient {
    /// `GET /me`
    fn current_user_id(&mut self) -> Res<String> {
        let url = self.url("me");
        let user: CurrentUser = self.get(&url, &[])?;
        Ok(user.id)
    }

    /// `POST /users/{user_id}/playlists`
    fn create_playlist(&mut self, owner_id: &str, request: &CreatePlaylistRequest) -> Res<String> {
        let url = self.url(&format!("users/{owner_id}/playlists"));
        let res: CreatePlaylistResponse = self.post(&url, request)?;
        Ok(res.id)
    }

    /// `POST /playlists/{playlist_id}/tracks`, at most 100 URIs per call.
    fn add_tracks(&mut self, playlist_id: &str, uris: &[String]) -> Res<()> {
        let url = self.url(&format!("playlists/{playlist_id}/tracks"));
        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        let _: AddTrackToPlaylistResponse = self.post(&url, &body)?;
        Ok(())
    }
}
