//! # Sample Catalogue
//!
//! Six sample destinations. They back the in-memory fallback store and are
//! what the `seed` binary writes into an empty store.

use crate::types::Destination;

struct Sample {
    id: &'static str,
    name: &'static str,
    country: &'static str,
    description: &'static str,
    short_description: &'static str,
    image_url: &'static str,
    rating: f64,
    activities: [&'static str; 4],
    price: f64,
    continent: &'static str,
}

const SAMPLES: [Sample; 6] = [
    Sample {
        id: "1",
        name: "Bali",
        country: "Indonesia",
        description: "Bali is a beautiful Indonesian island known for its forested volcanic mountains, iconic rice paddies, beaches and coral reefs. The island is home to religious sites such as cliffside Uluwatu Temple. To the south, the beachside city of Kuta has lively bars, while Seminyak, Sanur and Nusa Dua are popular resort towns. The island is also known for its yoga and meditation retreats.",
        short_description: "A tropical paradise with beautiful beaches and rich culture",
        image_url: "https://images.unsplash.com/photo-1472396961693-142e6e269027",
        rating: 4.7,
        activities: ["Surfing", "Temple Visits", "Rice Terrace Tours", "Beach Relaxation"],
        price: 1200.0,
        continent: "Asia",
    },
    Sample {
        id: "2",
        name: "Paris",
        country: "France",
        description: "Paris, France's capital, is a major European city and a global center for art, fashion, gastronomy and culture. Its 19th-century cityscape is crisscrossed by wide boulevards and the River Seine. Beyond such landmarks as the Eiffel Tower and the 12th-century, Gothic Notre-Dame cathedral, the city is known for its cafe culture and designer boutiques along the Rue du Faubourg Saint-Honoré.",
        short_description: "The City of Light with iconic landmarks and amazing cuisine",
        image_url: "https://images.unsplash.com/photo-1433086966358-54859d0ed716",
        rating: 4.5,
        activities: ["Eiffel Tower Visit", "Louvre Museum", "Seine River Cruise", "Cafe Hopping"],
        price: 1800.0,
        continent: "Europe",
    },
    Sample {
        id: "3",
        name: "New York",
        country: "United States",
        description: "New York City comprises 5 boroughs sitting where the Hudson River meets the Atlantic Ocean. At its core is Manhattan, a densely populated borough that's among the world's major commercial, financial and cultural centers. Its iconic sites include skyscrapers such as the Empire State Building and sprawling Central Park.",
        short_description: "The Big Apple with iconic skyscrapers and vibrant culture",
        image_url: "https://images.unsplash.com/photo-1482938289607-e9573fc25ebb",
        rating: 4.6,
        activities: ["Central Park Tour", "Broadway Show", "Museum Visits", "Shopping"],
        price: 2200.0,
        continent: "North America",
    },
    Sample {
        id: "4",
        name: "Tokyo",
        country: "Japan",
        description: "Tokyo, Japan's busy capital, mixes the ultramodern and the traditional, from neon-lit skyscrapers to historic temples. The opulent Meiji Shinto Shrine is known for its towering gate and surrounding woods. The Imperial Palace sits amid large public gardens. The city's many museums offer exhibits ranging from classical art (in the Tokyo National Museum) to a reconstructed kabuki theater (in the Edo-Tokyo Museum).",
        short_description: "A futuristic city with a blend of modern and traditional",
        image_url: "https://images.unsplash.com/photo-1500375592092-40eb2168fd21",
        rating: 4.8,
        activities: ["Shrine Visits", "Sushi Dining", "Shopping in Shibuya", "Cherry Blossom Viewing"],
        price: 2400.0,
        continent: "Asia",
    },
    Sample {
        id: "5",
        name: "Cairo",
        country: "Egypt",
        description: "Cairo, Egypt's sprawling capital, is set on the Nile River. At its heart is Tahrir Square and the vast Egyptian Museum, a trove of antiquities including royal mummies and gilded King Tutankhamun artifacts. Nearby, Giza is the site of the iconic pyramids and Great Sphinx, dating to the 26th century BC. In Gezira Island's leafy Zamalek district, 187m Cairo Tower affords panoramic city views.",
        short_description: "Ancient pyramids and a rich historical experience",
        image_url: "https://images.unsplash.com/photo-1482881497185-d4a9ddbe4151",
        rating: 4.3,
        activities: ["Pyramid Tours", "Nile River Cruise", "Museum Visits", "Bazaar Shopping"],
        price: 1500.0,
        continent: "Africa",
    },
    Sample {
        id: "6",
        name: "Sydney",
        country: "Australia",
        description: "Sydney, capital of New South Wales and one of Australia's largest cities, is best known for its harbourfront Sydney Opera House, with a distinctive sail-like design. Massive Darling Harbour and the smaller Circular Quay port are hubs of waterside life, with the arched Harbour Bridge and esteemed Royal Botanic Garden nearby. Sydney Tower's outdoor platform, the Skywalk, offers 360-degree views of the city and suburbs.",
        short_description: "Stunning harbor views and beautiful coastal beaches",
        image_url: "https://images.unsplash.com/photo-1426604966848-d7adac402bff",
        rating: 4.6,
        activities: ["Opera House Tour", "Bondi Beach Visit", "Harbor Cruise", "Koala Encounters"],
        price: 2600.0,
        continent: "Australia",
    },
];

/// Returns the six sample destinations, in catalogue order.
///
/// Ids are the literal strings "1" through "6".
pub fn sample_destinations() -> Vec<Destination> {
    SAMPLES
        .iter()
        .map(|sample| Destination {
            id: sample.id.to_string(),
            name: sample.name.to_string(),
            country: sample.country.to_string(),
            description: sample.description.to_string(),
            short_description: sample.short_description.to_string(),
            image_url: sample.image_url.to_string(),
            rating: sample.rating,
            activities: sample.activities.iter().map(|a| a.to_string()).collect(),
            price: sample.price,
            currency: "USD".to_string(),
            continent: sample.continent.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_shape() {
        let destinations = sample_destinations();
        assert_eq!(destinations.len(), 6);

        for d in &destinations {
            assert!((4.3..=4.8).contains(&d.rating), "{} rating", d.name);
            assert!((1200.0..=2600.0).contains(&d.price), "{} price", d.name);
            assert_eq!(d.activities.len(), 4);
            assert_eq!(d.currency, "USD");
        }
    }

    #[test]
    fn test_catalogue_ids_unique() {
        let destinations = sample_destinations();
        let mut ids: Vec<_> = destinations.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), destinations.len());
    }
}
