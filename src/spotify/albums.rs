use crate::{
    Res,
    snapshot::AlbumSource,
    spotify::SpotifyClient,
    types::{AlbumPage, Artist, SavedAlbumsResponse, SeveralArtistsResponse},
};

impl AlbumSource for SpotifyClient {
    /// `GET /me/albums`
    fn saved_albums(&mut self, limit: usize, offset: usize) -> Res<AlbumPage> {
        let url = self.url("me/albums");
        let res: SavedAlbumsResponse = self.get(
            &url,
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )?;

        Ok(AlbumPage {
            has_next: res.next.is_some(),
            items: res.items,
        })
    }

    /// `GET /artists?ids=...`, at most 50 ids.
    fn artists(&mut self, ids: &[String]) -> Res<Vec<Option<Artist>>> {
        let url = self.url("artists");
        let res: SeveralArtistsResponse = self.get(&url, &[("ids", ids.join(","))])?;
        Ok(res.artists)
    }
}
